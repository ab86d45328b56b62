use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub allocations_total: IntCounterVec,
    pub completions_total: IntCounter,
    pub rejections_total: IntCounter,
    pub pickup_requests_total: IntCounter,
    pub active_collection_points: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let allocations_total = IntCounterVec::new(
            Opts::new("allocations_total", "Total driver allocations by outcome"),
            &["outcome"],
        )
        .expect("valid allocations_total metric");

        let completions_total =
            IntCounter::new("completions_total", "Total completed pickup orders")
                .expect("valid completions_total metric");

        let rejections_total =
            IntCounter::new("rejections_total", "Total rejected pickup orders")
                .expect("valid rejections_total metric");

        let pickup_requests_total =
            IntCounter::new("pickup_requests_total", "Total pickup requests created")
                .expect("valid pickup_requests_total metric");

        let active_collection_points = IntGauge::new(
            "active_collection_points",
            "Collection points currently awaiting completion",
        )
        .expect("valid active_collection_points metric");

        registry
            .register(Box::new(allocations_total.clone()))
            .expect("register allocations_total");
        registry
            .register(Box::new(completions_total.clone()))
            .expect("register completions_total");
        registry
            .register(Box::new(rejections_total.clone()))
            .expect("register rejections_total");
        registry
            .register(Box::new(pickup_requests_total.clone()))
            .expect("register pickup_requests_total");
        registry
            .register(Box::new(active_collection_points.clone()))
            .expect("register active_collection_points");

        Self {
            registry,
            allocations_total,
            completions_total,
            rejections_total,
            pickup_requests_total,
            active_collection_points,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
