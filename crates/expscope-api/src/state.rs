use std::sync::Arc;

use expscope_storage::Storage;

#[derive(Clone)]
pub struct ApiState {
    pub storage: Arc<Storage>,
}
