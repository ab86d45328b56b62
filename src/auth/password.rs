use uuid::Uuid;

/// Salted digest for stored credentials.
pub fn hash_password(password: &str, salt: &str) -> String {
    sha256::digest(format!("{salt}:{password}"))
}

pub fn verify_password(password: &str, salt: &str, digest: &str) -> bool {
    hash_password(password, salt) == digest
}

pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Default password handed out on staff creation and password reset,
/// delivered by email with instructions to change it.
pub fn generated_password() -> String {
    let tag = Uuid::new_v4().simple().to_string()[..4].to_uppercase();
    format!("trash-{tag}")
}
