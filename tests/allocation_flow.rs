mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use trashaway::models::user::Role;

use common::{body_json, get_request, json_request, seed_user, setup, token_for};

async fn create_pickup_request(
    app: &axum::Router,
    token: &str,
    user_id: uuid::Uuid,
) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/user/request-pickup/{user_id}"),
            Some(token),
            json!({
                "capacity": 4,
                "location": "12 Analytical Way",
                "time": "2026-09-01T09:00:00Z",
                "category": "Recyclable"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn allocate_then_complete_marks_request_completed() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    let driver = seed_user(&state, "Ada", "ada@trashaway.ng", Role::Staff, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let driver_token = token_for(&state, &driver);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();
    assert_eq!(request["status"], "Pending");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            json!({
                "driver_name": "Ada",
                "capacity": 4,
                "location": "12 Analytical Way",
                "category": "Recyclable",
                "user_phone": "07012345678"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let point = body_json(response).await;
    assert_eq!(point["request_id"], request_id.as_str());
    assert_eq!(point["driver_name"], "Ada");
    assert_eq!(point["status"], "Pending");
    let collection_code = point["collection_code"].as_str().unwrap().to_string();
    assert!(collection_code.starts_with("CP-"));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/staff/complete-order/{request_id}/{}", driver.id),
            Some(&driver_token),
            json!({
                "location": "12 Analytical Way",
                "items": 4,
                "category": "Recyclable",
                "time_arrived": "09:15",
                "time_left": "09:40",
                "picture_proof": "proof/1234.jpg"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let record = body_json(response).await;
    assert_eq!(record["collection_code"], collection_code.as_str());
    assert_eq!(record["order_id"], request_id.as_str());

    let request_uuid: uuid::Uuid = request_id.parse().unwrap();
    let (status, confirmed) = state
        .ledger
        .read(|shelves| {
            (
                shelves.requests.get(&request_uuid).unwrap().status,
                shelves.confirmed.len(),
            )
        })
        .await;
    assert_eq!(status, trashaway::models::pickup::PickupStatus::Completed);
    assert_eq!(confirmed, 1);
}

#[tokio::test]
async fn allocate_then_reject_makes_request_reallocatable() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    let driver = seed_user(&state, "Bo", "bo@trashaway.ng", Role::Staff, "pw");
    seed_user(&state, "Ada", "ada@trashaway.ng", Role::Staff, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let driver_token = token_for(&state, &driver);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let allocate_body = |driver_name: &str| {
        json!({
            "driver_name": driver_name,
            "capacity": 4,
            "location": "12 Analytical Way",
            "category": "Recyclable",
            "user_phone": "07012345678"
        })
    };

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            allocate_body("Bo"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let point = body_json(response).await;
    let point_id: uuid::Uuid = point["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/staff/reject-order/{request_id}/{}", driver.id),
            Some(&driver_token),
            json!({ "reject_reason": "unreachable" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let record = body_json(response).await;
    assert_eq!(record["reject_reason"], "unreachable");

    let request_uuid: uuid::Uuid = request_id.parse().unwrap();
    let (status, point_exists, rejected) = state
        .ledger
        .read(|shelves| {
            (
                shelves.requests.get(&request_uuid).unwrap().status,
                shelves.collection_points.contains_key(&point_id),
                shelves.rejected.len(),
            )
        })
        .await;
    assert_eq!(status, trashaway::models::pickup::PickupStatus::Pending);
    assert!(!point_exists);
    assert_eq!(rejected, 1);

    // The request is pending again, so a second allocation succeeds.
    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            allocate_body("Ada"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let point = body_json(response).await;
    assert_eq!(point["driver_name"], "Ada");
}

#[tokio::test]
async fn double_allocation_returns_409() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    seed_user(&state, "Ada", "ada@trashaway.ng", Role::Staff, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let body = json!({
        "driver_name": "Ada",
        "capacity": 4,
        "location": "12 Analytical Way",
        "category": "Recyclable",
        "user_phone": "07012345678"
    });

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn allocation_with_unknown_driver_returns_404() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            json!({
                "driver_name": "Nobody",
                "capacity": 4,
                "location": "12 Analytical Way",
                "category": "Recyclable",
                "user_phone": "07012345678"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request_uuid: uuid::Uuid = request_id.parse().unwrap();
    let status = state
        .ledger
        .read(|shelves| shelves.requests.get(&request_uuid).unwrap().status)
        .await;
    assert_eq!(status, trashaway::models::pickup::PickupStatus::Pending);
}

#[tokio::test]
async fn staff_cannot_complete_as_another_driver() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    let driver = seed_user(&state, "Ada", "ada@trashaway.ng", Role::Staff, "pw");
    let other = seed_user(&state, "Bo", "bo@trashaway.ng", Role::Staff, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let other_token = token_for(&state, &other);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            json!({
                "driver_name": "Ada",
                "capacity": 4,
                "location": "12 Analytical Way",
                "category": "Recyclable",
                "user_phone": "07012345678"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Bo's token on a path naming Ada's driver id.
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/staff/complete-order/{request_id}/{}", driver.id),
            Some(&other_token),
            json!({
                "location": "12 Analytical Way",
                "items": 4,
                "category": "Recyclable",
                "time_arrived": "09:15",
                "time_left": "09:40",
                "picture_proof": "proof/1234.jpg"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn search_order_by_collection_code() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    let driver = seed_user(&state, "Ada", "ada@trashaway.ng", Role::Staff, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let driver_token = token_for(&state, &driver);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            json!({
                "driver_name": "Ada",
                "capacity": 4,
                "location": "12 Analytical Way",
                "category": "Recyclable",
                "user_phone": "07012345678"
            }),
        ))
        .await
        .unwrap();
    let point = body_json(response).await;
    let collection_code = point["collection_code"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/staff/search-order",
            Some(&driver_token),
            json!({ "collection_code": collection_code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let found = body_json(response).await;
    assert_eq!(found["collection_code"], collection_code.as_str());
    assert_eq!(found["scheduled_for"], "1 September 2026");

    let response = app
        .oneshot(json_request(
            "POST",
            "/staff/search-order",
            Some(&driver_token),
            json!({ "collection_code": "CP-FFFFFF" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn driver_sees_own_orders() {
    let (app, state) = setup();
    let admin = seed_user(&state, "Root", "root@trashaway.ng", Role::Admin, "pw");
    let driver = seed_user(&state, "Ada", "ada@trashaway.ng", Role::Staff, "pw");
    let user = seed_user(&state, "Casey", "casey@trashaway.ng", Role::User, "pw");

    let admin_token = token_for(&state, &admin);
    let driver_token = token_for(&state, &driver);
    let user_token = token_for(&state, &user);

    let request = create_pickup_request(&app, &user_token, user.id).await;
    let request_id = request["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/admin/update-pickup-request/{request_id}"),
            Some(&admin_token),
            json!({
                "driver_name": "Ada",
                "capacity": 4,
                "location": "12 Analytical Way",
                "category": "Recyclable",
                "user_phone": "07012345678"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request(
            &format!("/staff/all-orders/{}", driver.id),
            Some(&driver_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["orders"][0]["driver_name"], "Ada");
}
