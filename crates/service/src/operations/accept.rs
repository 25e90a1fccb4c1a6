use domain::{Operation, Order, resolve_packaging};

use crate::error::{Result, ServiceError};
use crate::requests::AcceptOrderRequest;
use crate::service::OrderService;

impl OrderService {
    /// Accepts an order from a courier into storage at this pickup point.
    ///
    /// The packaging cost is added before the order is written. An ID that is
    /// already known fails with [`ServiceError::OrderAlreadyExists`] and
    /// leaves the stored order as it was.
    #[tracing::instrument(skip(self), fields(order_id = %req.id))]
    pub async fn accept_order(&self, req: AcceptOrderRequest) -> Result<Order> {
        let packaging = resolve_packaging(req.packaging, req.add_film)?;

        let mut order = Order::new(
            req.id,
            req.client_id,
            self.config.pickup_point_id,
            req.weight,
            req.cost,
        );
        order.apply_packaging(packaging.as_ref())?;

        let written = self.repo.insert(&order).await?;
        if written.existed {
            return Err(ServiceError::OrderAlreadyExists(req.id));
        }

        self.set_order_cache(&written.order).await;
        metrics::counter!("orders_accepted_total").increment(1);
        self.send_event(req.id, Operation::Accept);

        tracing::info!(cost = written.order.cost(), "order accepted");
        Ok(written.order)
    }
}
