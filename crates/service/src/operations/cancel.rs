use domain::{Order, Status};

use crate::error::{Result, ServiceError};
use crate::requests::CancelOrderRequest;
use crate::service::OrderService;

impl OrderService {
    /// Hands an order back to the courier.
    ///
    /// Allowed for returned orders, and for stored orders whose storage period
    /// has run out.
    #[tracing::instrument(skip(self), fields(order_id = %req.id))]
    pub async fn cancel_order(&self, req: CancelOrderRequest) -> Result<Order> {
        let mut order = self.get_order(req.id).await?;

        let now = self.clock.now();
        let cancellable = match order.status() {
            Status::Returned => true,
            Status::Stored => order.is_expired(self.config.store_duration, now),
            Status::ReachedClient | Status::Canceled => false,
        };
        if !cancellable {
            return Err(ServiceError::CannotCancel(req.id));
        }

        order.set_status(Status::Canceled);
        let written = self.add_or_update(&order).await?;

        tracing::info!("order canceled");
        Ok(written.order)
    }
}
