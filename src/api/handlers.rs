//! Storefront page handlers
//!
//! Every product action follows the same sequence: resolve the product,
//! resolve the visitor, publish the event and wait for the sink, then render
//! or redirect. A failed publish fails the whole request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::api::{views, AppState, VisitorSession};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::models::{EventType, Product, UserEvent};

/// Where cart and purchase actions send the visitor afterwards
pub const PRODUCTS_PATH: &str = "/products";

/// GET /
pub async fn home() -> Html<String> {
    views::home()
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    session: VisitorSession,
) -> Result<Html<String>> {
    render_listing(&state, &session)
        .await
        .map_err(|e| e.page("Error loading products"))
}

async fn render_listing(state: &AppState, session: &VisitorSession) -> Result<Html<String>> {
    let event = UserEvent::listing_view(session.user_id().await?, session.session_id().await?);
    state.publisher.send_event(&event).await?;

    let message = session.take_flash().await?;
    Ok(views::product_list(state.catalog.all_products(), message.as_deref()))
}

/// GET /products/:id
pub async fn product_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: VisitorSession,
) -> Result<Html<String>> {
    render_details(&state, &id, &session)
        .await
        .map_err(|e| e.page("Error loading product"))
}

async fn render_details(state: &AppState, id: &str, session: &VisitorSession) -> Result<Html<String>> {
    let product = find_product(&state.catalog, id)?;
    publish_product_event(state, session, EventType::ProductView, product).await?;
    Ok(views::product_details(product))
}

/// POST /products/:id/addToCart
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: VisitorSession,
) -> Result<Redirect> {
    record_and_redirect(&state, &id, &session, EventType::AddToCart)
        .await
        .map_err(|e| e.page("Error adding to cart"))
}

/// POST /products/:id/purchase
pub async fn purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: VisitorSession,
) -> Result<Redirect> {
    record_and_redirect(&state, &id, &session, EventType::Purchase)
        .await
        .map_err(|e| e.page("Error processing purchase"))
}

/// Publish a cart or purchase event, then flash a confirmation and redirect.
/// Nothing is flashed unless the event was accepted.
async fn record_and_redirect(
    state: &AppState,
    id: &str,
    session: &VisitorSession,
    event_type: EventType,
) -> Result<Redirect> {
    let product = find_product(&state.catalog, id)?;
    publish_product_event(state, session, event_type, product).await?;

    session.set_flash(confirmation_message(event_type, product)).await?;
    Ok(Redirect::to(PRODUCTS_PATH))
}

async fn publish_product_event(
    state: &AppState,
    session: &VisitorSession,
    event_type: EventType,
    product: &Product,
) -> Result<()> {
    let event = UserEvent::for_product(
        event_type,
        product,
        session.user_id().await?,
        session.session_id().await?,
    );
    state.publisher.send_event(&event).await?;
    Ok(())
}

fn find_product<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Product> {
    catalog
        .product_by_id(id)
        .ok_or_else(|| Error::not_found(format!("product '{}'", id)))
}

/// Flash text shown after a cart or purchase action
pub fn confirmation_message(event_type: EventType, product: &Product) -> String {
    match event_type {
        EventType::Purchase => format!("Successfully purchased {}!", product.name),
        _ => format!("{} added to cart!", product.name),
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Page not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_messages() {
        let catalog = Catalog::demo();
        let mouse = catalog.product_by_id("P002").unwrap();
        assert_eq!(
            confirmation_message(EventType::AddToCart, mouse),
            "Wireless Mouse added to cart!"
        );
        assert_eq!(
            confirmation_message(EventType::Purchase, mouse),
            "Successfully purchased Wireless Mouse!"
        );
    }

    #[test]
    fn test_find_product_not_found() {
        let catalog = Catalog::demo();
        let err = find_product(&catalog, "P999").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(find_product(&catalog, "P003").unwrap().id, "P003");
    }
}
