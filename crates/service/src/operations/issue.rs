use std::collections::{HashMap, HashSet};

use domain::{Filter, Operation, Status};
use store::OrderRepositoryExt;

use crate::error::{IssueErrors, Result, ServiceError};
use crate::requests::{IssueOrdersRequest, IssueOrdersResponse};
use crate::service::OrderService;

impl OrderService {
    /// Hands stored orders to their client.
    ///
    /// The client is taken from the first requested order. Every requested ID
    /// that does not name one of that client's orders stored at this pickup
    /// point is reported in the response instead of failing the call; the
    /// rest are issued together in one store transaction.
    #[tracing::instrument(skip(self, req), fields(requested = req.ids.len()))]
    pub async fn issue_orders(&self, req: IssueOrdersRequest) -> Result<IssueOrdersResponse> {
        let Some(&first) = req.ids.first() else {
            return Err(ServiceError::EmptyIssueRequest);
        };

        let owner = self.get_order(first).await?;
        let mut client_orders: HashMap<_, _> = self
            .repo
            .get_by(&Filter::for_client(owner.client_id()))
            .await?
            .into_iter()
            .map(|o| (o.id(), o))
            .collect();

        let mut seen = HashSet::with_capacity(req.ids.len());
        let mut issuable = Vec::with_capacity(req.ids.len());
        let mut rejected = IssueErrors::default();

        for id in req.ids.iter().copied().filter(|id| seen.insert(*id)) {
            match client_orders.remove(&id) {
                Some(order)
                    if order.status().can_issue()
                        && order.pickup_point_id() == self.config.pickup_point_id =>
                {
                    issuable.push(order.with_status(Status::ReachedClient));
                }
                _ => rejected.push(ServiceError::NotIssuable(id)),
            }
        }

        let orders = if issuable.is_empty() {
            Vec::new()
        } else {
            self.add_or_update_list(&issuable).await?
        };

        for order in &orders {
            self.send_event(order.id(), Operation::Issue);
        }
        metrics::counter!("issued_orders_total").increment(orders.len() as u64);

        if !rejected.is_empty() {
            tracing::warn!(rejected = %rejected, "some orders were not issued");
        }
        tracing::info!(issued = orders.len(), "orders issued");

        Ok(IssueOrdersResponse {
            orders,
            rejected: rejected.into_option(),
        })
    }
}
