//! The fixed route and cluster catalogue.
//!
//! Reproduces the gateway's production tables: one rule per backend
//! operation, each naming its target cluster and, where the operation is
//! not public, the policy that gates it.

use axum::http::Method;

use crate::cluster::ClusterRule;
use crate::config::ServicesConfig;
use crate::policy::Policy;
use crate::routing::{RouteRule, RouteTableError};

pub const AUTH_CLUSTER: &str = "auth";
pub const USER_SERVICE_CLUSTER: &str = "user-service";
pub const PAYMENT_SERVICE_CLUSTER: &str = "payment-service";
pub const PRODUCT_SERVICE_CLUSTER: &str = "product-service";
pub const ORDER_SERVICE_CLUSTER: &str = "order-service";

/// Build the cluster table from configured service destinations.
pub fn build_clusters(services: &ServicesConfig) -> Vec<ClusterRule> {
    vec![
        ClusterRule::new(AUTH_CLUSTER, services.auth.url.clone()),
        ClusterRule::new(USER_SERVICE_CLUSTER, services.user_service.url.clone()),
        ClusterRule::new(PAYMENT_SERVICE_CLUSTER, services.payment_service.url.clone()),
        ClusterRule::new(PRODUCT_SERVICE_CLUSTER, services.product_service.url.clone()),
        ClusterRule::new(ORDER_SERVICE_CLUSTER, services.order_service.url.clone()),
    ]
}

/// Build the full route table.
///
/// Registration order matters only between rules whose patterns could both
/// match a path; `products-by-category` must precede `products-get-by-id`.
pub fn build_routes() -> Result<Vec<RouteRule>, RouteTableError> {
    use Method as M;

    let routes = vec![
        // Authentication (public)
        route("auth-login", "/api/auth/login", &[M::POST, M::OPTIONS], AUTH_CLUSTER, None)?,
        //
        // Users. Create is public (sign-up); everything else is gated.
        route("users-create", "/api/users", &[M::POST], USER_SERVICE_CLUSTER, None)?,
        route(
            "users-list",
            "/api/users",
            &[M::GET],
            USER_SERVICE_CLUSTER,
            Some(Policy::AdminOrManager),
        )?,
        route(
            "users-get-by-id",
            "/api/users/{id}",
            &[M::GET],
            USER_SERVICE_CLUSTER,
            Some(Policy::AdminOrManager),
        )?,
        route(
            "users-by-email",
            "/api/users/email/{email}",
            &[M::GET],
            USER_SERVICE_CLUSTER,
            Some(Policy::DataQuery),
        )?,
        route(
            "users-by-cpf",
            "/api/users/cpf/{cpf}",
            &[M::GET],
            USER_SERVICE_CLUSTER,
            Some(Policy::DataQuery),
        )?,
        route(
            "users-update",
            "/api/users/{id}",
            &[M::PUT],
            USER_SERVICE_CLUSTER,
            Some(Policy::AdminOrManager),
        )?,
        route(
            "users-delete",
            "/api/users/{id}",
            &[M::DELETE],
            USER_SERVICE_CLUSTER,
            Some(Policy::AdminOrManager),
        )?,
        //
        // Payments. The webhook and QR images are called by the payment
        // provider, not by logged-in users.
        route(
            "payment-create",
            "/api/payment",
            &[M::POST],
            PAYMENT_SERVICE_CLUSTER,
            Some(Policy::AuthenticatedUser),
        )?,
        route(
            "payment-qr-image",
            "/api/payment/qr-image/{**rest}",
            &[M::GET],
            PAYMENT_SERVICE_CLUSTER,
            None,
        )?,
        route(
            "payment-webhook",
            "/api/payment/webhook",
            &[M::POST],
            PAYMENT_SERVICE_CLUSTER,
            None,
        )?,
        //
        // Products. Browsing is public; mutation is management-only.
        // by-category is registered before by-id so the longer static
        // prefix wins.
        route("products-list", "/api/products", &[M::GET], PRODUCT_SERVICE_CLUSTER, None)?,
        route(
            "products-by-category",
            "/api/products/category/{category}",
            &[M::GET],
            PRODUCT_SERVICE_CLUSTER,
            None,
        )?,
        route(
            "products-get-by-id",
            "/api/products/{id}",
            &[M::GET],
            PRODUCT_SERVICE_CLUSTER,
            None,
        )?,
        route(
            "products-create",
            "/api/products",
            &[M::POST],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        route(
            "products-update",
            "/api/products/{id}",
            &[M::PUT],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        route(
            "products-delete",
            "/api/products/{id}",
            &[M::DELETE],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        //
        // Categories.
        // TODO: confirm with the product owner that categories and items
        // intentionally have no by-category route while products do.
        route("categories-list", "/api/categories", &[M::GET], PRODUCT_SERVICE_CLUSTER, None)?,
        route(
            "categories-get-by-id",
            "/api/categories/{id}",
            &[M::GET],
            PRODUCT_SERVICE_CLUSTER,
            None,
        )?,
        route(
            "categories-create",
            "/api/categories",
            &[M::POST],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        route(
            "categories-update",
            "/api/categories/{id}",
            &[M::PUT],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        route(
            "categories-delete",
            "/api/categories/{id}",
            &[M::DELETE],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        //
        // Items.
        route("items-list", "/api/items", &[M::GET], PRODUCT_SERVICE_CLUSTER, None)?,
        route(
            "items-get-by-id",
            "/api/items/{id}",
            &[M::GET],
            PRODUCT_SERVICE_CLUSTER,
            None,
        )?,
        route(
            "items-create",
            "/api/items",
            &[M::POST],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        route(
            "items-update",
            "/api/items/{id}",
            &[M::PUT],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        route(
            "items-delete",
            "/api/items/{id}",
            &[M::DELETE],
            PRODUCT_SERVICE_CLUSTER,
            Some(Policy::Management),
        )?,
        //
        // Orders.
        route(
            "orders-create",
            "/api/orders",
            &[M::POST],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::AuthenticatedUser),
        )?,
        route(
            "orders-list",
            "/api/orders",
            &[M::GET],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::KitchenStaff),
        )?,
        route(
            "orders-get-by-id",
            "/api/orders/{id}",
            &[M::GET],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::AuthenticatedUser),
        )?,
        route(
            "orders-update",
            "/api/orders/{id}",
            &[M::PUT],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::OrderManagement),
        )?,
        route(
            "orders-delete",
            "/api/orders/{id}",
            &[M::DELETE],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::AdminOnly),
        )?,
        route(
            "orders-ready",
            "/api/orders/{id}/ready",
            &[M::PUT],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::OrderManagement),
        )?,
        route(
            "orders-confirm-payment",
            "/api/orders/{id}/confirm-payment",
            &[M::PUT],
            ORDER_SERVICE_CLUSTER,
            Some(Policy::Operators),
        )?,
    ];

    Ok(routes)
}

fn route(
    id: &str,
    pattern: &str,
    methods: &[Method],
    cluster: &str,
    policy: Option<Policy>,
) -> Result<RouteRule, RouteTableError> {
    RouteRule::new(id, pattern, methods, cluster, policy)
}
