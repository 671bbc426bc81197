pub mod confidence;
pub mod demand;
pub mod heuristics;
pub mod horizon;
pub mod money;
pub mod payment_method;
pub mod sale_status;
pub mod window;
