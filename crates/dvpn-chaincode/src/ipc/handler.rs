use super::payloads::{
    TransactionEnvelope, TransactionPayload, TransactionRequest, TransactionResponse,
};
use crate::domain::entities::UnixSeconds;
use crate::errors::ChaincodeError;
use crate::ports::{ChaincodeMetrics, DvpnChaincodeApi, TxClock};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Function label used when the envelope itself cannot be decoded.
pub const INVALID_ENVELOPE: &str = "InvalidEnvelope";

/// Dispatches transaction envelopes to the chaincode.
///
/// ## Thread Safety
///
/// Holds only `Arc`s to `Send + Sync` collaborators; invocations may run
/// concurrently. Ordering of conflicting writes is the ledger's concern.
pub struct TransactionHandler<A, C, M>
where
    A: DvpnChaincodeApi,
    C: TxClock,
    M: ChaincodeMetrics,
{
    chaincode: Arc<A>,
    clock: Arc<C>,
    metrics: Arc<M>,
}

impl<A, C, M> TransactionHandler<A, C, M>
where
    A: DvpnChaincodeApi,
    C: TxClock,
    M: ChaincodeMetrics,
{
    pub fn new(chaincode: Arc<A>, clock: Arc<C>, metrics: Arc<M>) -> Self {
        Self {
            chaincode,
            clock,
            metrics,
        }
    }

    /// Run one transaction.
    ///
    /// The clock is read once; every write in the transaction carries that time.
    #[instrument(
        skip(self, envelope),
        fields(tx_id = %envelope.tx_id, function = envelope.request.function_name())
    )]
    pub fn invoke(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<TransactionResponse, ChaincodeError> {
        let function = envelope.request.function_name();
        let now = self.clock.now();
        let started = Instant::now();

        let result = self.dispatch(envelope.request, now);
        self.metrics
            .transaction_finished(function, result.as_ref().err(), started.elapsed());

        match result {
            Ok(payload) => {
                debug!(timestamp = now, "Transaction committed");
                Ok(TransactionResponse {
                    tx_id: envelope.tx_id,
                    function: function.to_string(),
                    timestamp: now,
                    payload,
                })
            }
            Err(e) => {
                warn!(error = %e, error_type = e.kind(), "Transaction failed");
                Err(e)
            }
        }
    }

    /// Decode a JSON envelope and run it.
    pub fn invoke_json(&self, bytes: &[u8]) -> Result<TransactionResponse, ChaincodeError> {
        let started = Instant::now();
        let envelope: TransactionEnvelope = match serde_json::from_slice(bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                let err = ChaincodeError::Decoding {
                    key: "transaction envelope".to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Rejected malformed transaction");
                self.metrics
                    .transaction_finished(INVALID_ENVELOPE, Some(&err), started.elapsed());
                return Err(err);
            }
        };
        self.invoke(envelope)
    }

    fn dispatch(
        &self,
        request: TransactionRequest,
        now: UnixSeconds,
    ) -> Result<TransactionPayload, ChaincodeError> {
        let cc = self.chaincode.as_ref();

        let payload = match request {
            TransactionRequest::RegisterDevice {
                id,
                name,
                ip_address,
            } => {
                cc.register_device_with_address(&id, &name, ip_address.as_deref(), now)?;
                TransactionPayload::Ack
            }
            TransactionRequest::GetDevice { id } => TransactionPayload::Device(cc.get_device(&id)?),
            TransactionRequest::EstablishConnection { device_id } => {
                TransactionPayload::ConnectionId(cc.establish_connection(&device_id, now)?)
            }
            TransactionRequest::GetConnection { connection_id } => {
                TransactionPayload::Connection(cc.get_connection(&connection_id)?)
            }
            TransactionRequest::CloseConnection { connection_id } => {
                TransactionPayload::Connection(cc.close_connection(&connection_id, now)?)
            }
            TransactionRequest::CreateAccessPolicy {
                device_id,
                permissions,
                valid_until,
            } => {
                cc.create_access_policy(&device_id, permissions, valid_until)?;
                TransactionPayload::Ack
            }
            TransactionRequest::GetAccessPolicy { device_id } => {
                TransactionPayload::AccessPolicy(cc.get_access_policy(&device_id)?)
            }
            TransactionRequest::CheckAccess {
                device_id,
                permission,
            } => {
                let decision = cc.evaluate_access(&device_id, &permission, now)?;
                TransactionPayload::Access {
                    granted: decision.is_granted(),
                    decision,
                }
            }
            TransactionRequest::UpdateHealthStatus {
                device_id,
                cpu,
                memory,
                bandwidth,
            } => TransactionPayload::HealthStatus(
                cc.update_health_status(&device_id, cpu, memory, bandwidth, now)?,
            ),
            TransactionRequest::GetHealthStatus { device_id } => {
                TransactionPayload::HealthStatus(cc.get_health_status(&device_id)?)
            }
            TransactionRequest::CheckHealthAlerts { device_id } => {
                TransactionPayload::Alerts(cc.check_health_alerts(&device_id)?)
            }
        };
        Ok(payload)
    }
}
