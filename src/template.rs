//! The opaque compiled form returned by [`compile`](crate::compile).

use std::sync::Arc;

/// A compiled template, ready for repeated [`process`](crate::process) calls.
///
/// Cheap to clone (an `Arc` bump) and `Send + Sync`, so the same compiled
/// template can be shared across threads without re-parsing. There is no
/// explicit release operation: dropping the last `Template` frees its
/// bytecode.
#[derive(Debug, Clone)]
pub struct Template {
    bytecode: Arc<[u8]>,
}

impl Template {
    pub(crate) fn from_bytecode(bytecode: Vec<u8>) -> Self {
        Template {
            bytecode: Arc::from(bytecode),
        }
    }

    pub(crate) fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }
}
