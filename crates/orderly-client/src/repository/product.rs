//! # Product Repository
//!
//! The menu. Anyone signed in can read it; create, update and delete are
//! refused by the backend (403) for customers.

use reqwest::Method;

use super::{expect_empty, expect_json};
use crate::error::ClientResult;
use crate::interceptor::AuthInterceptor;
use orderly_core::{Product, ProductInput};

#[derive(Debug, Clone)]
pub struct ProductRepository {
    interceptor: AuthInterceptor,
}

impl ProductRepository {
    pub fn new(interceptor: AuthInterceptor) -> Self {
        Self { interceptor }
    }

    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        let request = self.interceptor.request(Method::GET, "api/v1/products")?;
        expect_json(self.interceptor.send(request).await?).await
    }

    /// Lists the menu and keeps products whose name or description contains
    /// `query`. The backend has no search endpoint.
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().filter(|p| p.matches(query)).collect())
    }

    pub async fn get(&self, id: i64) -> ClientResult<Product> {
        let request = self
            .interceptor
            .request(Method::GET, &format!("api/v1/products/{id}"))?;
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn create(&self, product: &ProductInput) -> ClientResult<Product> {
        let request = self
            .interceptor
            .request(Method::POST, "api/v1/products")?
            .json(product);
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn update(&self, id: i64, product: &ProductInput) -> ClientResult<Product> {
        let request = self
            .interceptor
            .request(Method::PUT, &format!("api/v1/products/{id}"))?
            .json(product);
        expect_json(self.interceptor.send(request).await?).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let request = self
            .interceptor
            .request(Method::DELETE, &format!("api/v1/products/{id}"))?;
        expect_empty(self.interceptor.send(request).await?).await
    }
}
