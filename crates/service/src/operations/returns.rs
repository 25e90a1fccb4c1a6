use domain::{Operation, Order, Status};

use crate::error::{Result, ServiceError};
use crate::requests::AcceptReturnRequest;
use crate::service::OrderService;

impl OrderService {
    /// Takes an issued order back from its client.
    ///
    /// The client must own the order, bring it to the pickup point that
    /// issued it, and do so before the return window closes. An order that
    /// was never issued has no open window and fails as expired.
    #[tracing::instrument(skip(self), fields(order_id = %req.order_id, client_id = %req.client_id))]
    pub async fn accept_return(&self, req: AcceptReturnRequest) -> Result<Order> {
        let mut order = match self.get_order(req.order_id).await {
            Ok(order) => order,
            Err(ServiceError::OrderNotFound(id)) => return Err(ServiceError::OrderNotIssued(id)),
            Err(e) => return Err(e),
        };

        if order.client_id() != req.client_id {
            return Err(ServiceError::WrongClientId {
                order_id: req.order_id,
                client_id: req.client_id,
            });
        }
        if order.pickup_point_id() != self.config.pickup_point_id {
            return Err(ServiceError::WrongPickupPoint(req.order_id));
        }
        if !order.can_be_returned(self.config.return_window, self.clock.now()) {
            return Err(ServiceError::ReturnExpired(req.order_id));
        }

        order.set_status(Status::Returned);
        let written = self.add_or_update(&order).await?;
        self.send_event(req.order_id, Operation::Return);

        tracing::info!("return accepted");
        Ok(written.order)
    }
}
