//! Fixed records used by the commands

use domain_products::{CreateProduct, Review, Seller};

pub const VERTICAL_MOUSE: &str = "Vertical Mouse - HP";
pub const KEYBOARD: &str = "Keyboard";

/// Rate written by the find-one-and-update that follows the first insert
pub const VERTICAL_MOUSE_UPDATED_RATE: f64 = 89.99;

pub fn vertical_mouse() -> CreateProduct {
    CreateProduct {
        name: Some(VERTICAL_MOUSE.to_string()),
        rate: Some(99.50),
        dimension: Some("5inX2.5inX7in".to_string()),
        reviews: vec![Review::new("Alice", 5.0), Review::new("Bob", 4.0)],
        seller: Some(Seller {
            seller_name: Some("TechStore".to_string()),
            seller_location: Some("Canada".to_string()),
            seller_rating: Some(9.0),
        }),
        expiry_date: None,
    }
}

pub fn keyboard() -> CreateProduct {
    CreateProduct::named(KEYBOARD).with_rate(50.0)
}
