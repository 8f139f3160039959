use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CallError, ContractCall, ContractCaller};

/// Records every state-changing call without dispatching it.
///
/// Each call is answered with an empty result and each view with a single
/// zero word, so phases that read state still make progress in a dry run.
#[derive(Debug, Default)]
pub struct RecordingCaller {
    calls: Mutex<Vec<ContractCall>>,
}

impl RecordingCaller {
    /// Record calls without dispatching them.
    pub fn dry_run() -> Self {
        Self::default()
    }

    /// Calls recorded so far, in dispatch order.
    pub async fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ContractCaller for RecordingCaller {
    async fn call(&self, call: &ContractCall) -> Result<Bytes, CallError> {
        self.calls.lock().await.push(call.clone());
        Ok(Bytes::new())
    }

    async fn view(&self, _call: &ContractCall) -> Result<Bytes, CallError> {
        Ok(Bytes::from(vec![0u8; 32]))
    }

    async fn balance(&self, _address: Address) -> Result<U256, CallError> {
        Ok(U256::ZERO)
    }

    async fn fund(&self, _address: Address, _amount: U256) -> Result<(), CallError> {
        Ok(())
    }
}
