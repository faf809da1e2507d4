mod auth;
mod categories;
mod health;
mod payments;
mod products;
mod profile;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/register", post(auth::register_user))
        .route("/login", post(auth::login_user))
        .route("/product/{slug}", get(products::get_product))
        .route("/product/photo/{product_id}", get(products::get_photo))
        .route("/product/filtered", post(products::filtered_products))
        .route("/products/{page}", get(products::list_products))
        .route("/products/count", get(products::products_count))
        .route("/products/search/{keyword}", get(products::search_products))
        .route(
            "/products/related/{product_id}/{category_id}",
            get(products::related_products),
        )
        .route("/categories", get(categories::get_categories))
        .route("/age-categories", get(categories::get_age_categories));

    let authed = Router::new()
        .route("/braintree/token", get(payments::get_token))
        .route("/braintree/payment", post(payments::process_payment))
        .route("/orders", get(payments::get_orders))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware));

    // Catalog mutations live under /admin so the slug read can keep the bare
    // /product/{slug} path.
    let admin = Router::new()
        .route("/admin/product", post(products::create_product))
        .route(
            "/admin/product/{product_id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route_layer(middleware::from_fn(crate::middleware::admin_middleware));

    public.merge(authed).merge(admin)
}
