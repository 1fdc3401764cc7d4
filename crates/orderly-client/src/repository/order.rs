//! # Order Repository

use reqwest::Method;

use super::expect_json;
use crate::error::{ClientError, ClientResult};
use crate::interceptor::AuthInterceptor;
use orderly_core::{CreateOrderRequest, Order, OrderStatus, OrderStatusUpdate};

#[derive(Debug, Clone)]
pub struct OrderRepository {
    interceptor: AuthInterceptor,
}

impl OrderRepository {
    pub fn new(interceptor: AuthInterceptor) -> Self {
        Self { interceptor }
    }

    /// Places a single-product order for the signed-in user.
    pub async fn create(&self, order: &CreateOrderRequest) -> ClientResult<Order> {
        let request = self
            .interceptor
            .request(Method::POST, "api/v1/orders")?
            .json(order);
        expect_json(self.interceptor.send(request).await?).await
    }

    /// Orders placed by `username`.
    pub async fn of_user(&self, username: &str) -> ClientResult<Vec<Order>> {
        let mut url = self.interceptor.base_url().join("api/v1/orders/user/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl("base URL cannot take path segments".into()))?
            .pop_if_empty()
            .push(username);

        let request = self.interceptor.request_url(Method::GET, url);
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Order> {
        let request = self
            .interceptor
            .request(Method::GET, &format!("api/v1/orders/{id}"))?;
        expect_json(self.interceptor.send(request).await?).await
    }

    /// Every order (admin).
    pub async fn all(&self) -> ClientResult<Vec<Order>> {
        let request = self.interceptor.request(Method::GET, "api/v1/orders")?;
        expect_json(self.interceptor.send(request).await?).await
    }

    /// Moves an order to `status` (admin).
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        let request = self
            .interceptor
            .request(Method::PUT, &format!("api/v1/orders/{id}/status"))?
            .json(&OrderStatusUpdate { status });
        expect_json(self.interceptor.send(request).await?).await
    }
}
