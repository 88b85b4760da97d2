//! Server-rendered HTML pages

use axum::response::Html;

use crate::models::Product;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f6f7f9;color:#222}\
header{background:#232f3e;padding:1rem 2rem}header a{color:#fff;text-decoration:none;margin-right:1.5rem}\
main{max-width:1100px;margin:2rem auto;padding:0 1rem}\
.flash{background:#e6f4ea;border:1px solid #34a853;padding:.75rem 1rem;border-radius:6px;margin-bottom:1.5rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:1.5rem}\
.card{background:#fff;border-radius:8px;padding:1rem;box-shadow:0 1px 3px rgba(0,0,0,.1)}\
.card img,.details img{width:100%;border-radius:6px}.price{font-weight:600;font-size:1.2rem}\
.category{color:#666;font-size:.85rem}.details{display:grid;grid-template-columns:1fr 1fr;gap:2rem}\
form{display:inline-block;margin-right:.5rem}button{padding:.6rem 1.2rem;border:0;border-radius:6px;cursor:pointer}\
.cart{background:#ffd814}.buy{background:#ffa41c}";

/// Escape text for use inside HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Storefront</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><a href=\"/\">Home</a><a href=\"/products\">Products</a></header>\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
    ))
}

/// Landing page
pub fn home() -> Html<String> {
    layout(
        "Home",
        "<h1>Welcome to the Storefront demo</h1>\n\
         <p>Every page view, product view, add to cart and purchase is streamed \
         as an event for real-time analytics.</p>\n\
         <p><a href=\"/products\">Browse products</a></p>",
    )
}

/// Product listing, with the pending flash message if any
pub fn product_list(products: &[Product], message: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Products</h1>\n");

    if let Some(message) = message {
        body.push_str(&format!(
            "<div class=\"flash\" role=\"status\">{}</div>\n",
            escape_html(message)
        ));
    }

    body.push_str("<div class=\"grid\">\n");
    for product in products {
        body.push_str(&format!(
            "<div class=\"card\">\
             <img src=\"{image}\" alt=\"{name}\">\
             <h2><a href=\"/products/{id}\">{name}</a></h2>\
             <p class=\"category\">{category}</p>\
             <p class=\"price\">{price}</p>\
             </div>\n",
            image = escape_html(&product.image_url),
            name = escape_html(&product.name),
            id = escape_html(&product.id),
            category = escape_html(&product.category),
            price = product.display_price(),
        ));
    }
    body.push_str("</div>");

    layout("Products", &body)
}

/// Details page for one product, with cart and purchase actions
pub fn product_details(product: &Product) -> Html<String> {
    let id = escape_html(&product.id);
    let body = format!(
        "<div class=\"details\">\
         <img src=\"{image}\" alt=\"{name}\">\
         <div><h1>{name}</h1>\
         <p class=\"category\">{category}</p>\
         <p>{description}</p>\
         <p class=\"price\">{price}</p>\
         <form method=\"post\" action=\"/products/{id}/addToCart\">\
         <button class=\"cart\" type=\"submit\">Add to Cart</button></form>\
         <form method=\"post\" action=\"/products/{id}/purchase\">\
         <button class=\"buy\" type=\"submit\">Buy Now</button></form>\
         <p><a href=\"/products\">Back to products</a></p>\
         </div></div>",
        image = escape_html(&product.image_url),
        name = escape_html(&product.name),
        category = escape_html(&product.category),
        description = escape_html(&product.description),
        price = product.display_price(),
    );

    layout(&product.name, &body)
}
