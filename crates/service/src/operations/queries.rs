use domain::{Filter, Order, Status};
use store::OrderRepositoryExt;

use crate::error::Result;
use crate::requests::{GetOrdersRequest, GetReturnedRequest};
use crate::service::OrderService;

impl OrderService {
    /// Lists a client's orders that are waiting in storage.
    #[tracing::instrument(skip(self))]
    pub async fn get_orders(&self, req: GetOrdersRequest) -> Result<Vec<Order>> {
        let mut filter = Filter::for_client(req.client_id).status(Status::Stored);
        if req.local_only {
            filter = filter.pickup_point_id(self.config.pickup_point_id);
        }

        Ok(self.repo.get_by(&filter).await?)
    }

    /// Lists returned orders, one page at a time.
    #[tracing::instrument(skip(self))]
    pub async fn get_returned(&self, req: GetReturnedRequest) -> Result<Vec<Order>> {
        let filter = Filter::for_status(Status::Returned);
        Ok(self.repo.query(&filter, req.page, req.per_page).await?)
    }
}
