//! Restaurant and menu catalog
//!
//! Catalog records and the read-side service the screens browse with. The
//! service answers from the built-in mock dataset; when a backend URL is
//! configured it fetches through the HTTP client instead. The rest of the
//! core treats catalog values as opaque snapshots.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use api_client::{ApiClient, ApiError};

/// Catalog error types
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Unknown restaurant id
    #[error("Restaurant not found: {0}")]
    NotFound(String),

    /// API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// A restaurant listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Restaurant id
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Cover image URL
    pub image: String,
    /// Average rating out of 5
    pub rating: f32,
    /// Number of reviews behind the rating
    pub review_count: u32,
    /// Cuisine labels
    pub cuisine: Vec<String>,
    /// Expected delivery window (display string)
    pub delivery_time: String,
    /// Delivery fee in whole currency units
    pub delivery_fee: u32,
    /// Minimum order value in whole currency units
    pub minimum_order: u32,
    /// Whether the restaurant is currently open
    pub is_open: bool,
    /// Distance from campus (display string)
    pub distance: String,
    /// Marketing tags
    pub tags: Vec<String>,
    /// Active promotion banner, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<String>,
    /// Whether the user has favorited this restaurant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// A menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Item id
    pub id: String,
    /// Owning restaurant
    pub restaurant_id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Price in whole currency units
    pub price: u32,
    /// Image URL, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Menu section this item belongs to
    pub category: String,
    /// Vegetarian flag
    pub is_veg: bool,
    /// Shown with a "popular" badge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
    /// Shown with a "bestseller" badge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bestseller: Option<bool>,
    /// Customization option groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customizations: Vec<Customization>,
}

/// A customization option group on a menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    /// Group id
    pub id: String,
    /// Group label (e.g., "Crust")
    pub name: String,
    /// Whether a selection is mandatory
    pub required: bool,
    /// Maximum selections allowed in the group
    pub max_selections: u32,
    /// The selectable options
    pub options: Vec<CustomizationOption>,
}

/// One selectable option within a customization group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationOption {
    /// Option id
    pub id: String,
    /// Option label
    pub name: String,
    /// Price delta in whole currency units
    pub price: u32,
}

/// A browse category chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category id
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon name
    pub icon: String,
    /// Banner image URL, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Catalog read service
pub struct CatalogService {
    client: Option<Arc<ApiClient>>,
}

impl CatalogService {
    /// Create a service backed by the built-in mock dataset
    pub fn new() -> Self {
        Self { client: None }
    }

    /// Create a service backed by a configured backend
    pub fn with_client(client: Arc<ApiClient>) -> Self {
        Self { client: Some(client) }
    }

    /// List all restaurants
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        match &self.client {
            Some(client) => Ok(client.get("/restaurants").await?),
            None => Ok(mock::restaurants()),
        }
    }

    /// Fetch one restaurant by id
    pub async fn get_restaurant(&self, id: &str) -> Result<Restaurant> {
        match &self.client {
            Some(client) => Ok(client.get(&format!("/restaurants/{id}")).await?),
            None => mock::restaurants()
                .into_iter()
                .find(|restaurant| restaurant.id == id)
                .ok_or_else(|| CatalogError::NotFound(id.to_string())),
        }
    }

    /// Search restaurants by name, cuisine, or tag (case-insensitive)
    pub async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>> {
        if let Some(client) = &self.client {
            return Ok(client.get(&format!("/restaurants/search?q={query}")).await?);
        }

        let needle = query.to_lowercase();
        Ok(mock::restaurants()
            .into_iter()
            .filter(|restaurant| {
                restaurant.name.to_lowercase().contains(&needle)
                    || restaurant
                        .cuisine
                        .iter()
                        .any(|cuisine| cuisine.to_lowercase().contains(&needle))
                    || restaurant
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// List a restaurant's menu
    pub async fn menu_for_restaurant(&self, restaurant_id: &str) -> Result<Vec<MenuItem>> {
        match &self.client {
            Some(client) => Ok(client.get(&format!("/restaurants/{restaurant_id}/menu")).await?),
            None => Ok(mock::menu_items()
                .into_iter()
                .filter(|item| item.restaurant_id == restaurant_id)
                .collect()),
        }
    }

    /// List the browse categories
    ///
    /// Categories are app content, not backend content; they always come
    /// from the built-in dataset.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(mock::categories())
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in mock dataset
pub mod mock {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    /// The seeded restaurant list
    pub fn restaurants() -> Vec<Restaurant> {
        vec![
            Restaurant {
                id: "1".into(),
                name: "Pizza Paradise".into(),
                description: "Authentic Italian pizzas with fresh ingredients".into(),
                image: "https://images.unsplash.com/photo-1604382354936-07c5d9983bd3?w=400".into(),
                rating: 4.8,
                review_count: 342,
                cuisine: strings(&["Italian", "Pizza"]),
                delivery_time: "25-35 min".into(),
                delivery_fee: 0,
                minimum_order: 150,
                is_open: true,
                distance: "1.2 km".into(),
                tags: strings(&["Free Delivery", "Popular"]),
                promo: Some("20% OFF".into()),
                is_favorite: None,
            },
            Restaurant {
                id: "2".into(),
                name: "Burger Junction".into(),
                description: "Juicy burgers made with premium beef".into(),
                image: "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?w=400".into(),
                rating: 4.6,
                review_count: 256,
                cuisine: strings(&["American", "Burgers"]),
                delivery_time: "20-30 min".into(),
                delivery_fee: 25,
                minimum_order: 100,
                is_open: true,
                distance: "0.8 km".into(),
                tags: strings(&["Bestseller"]),
                promo: None,
                is_favorite: None,
            },
            Restaurant {
                id: "3".into(),
                name: "Spice Garden".into(),
                description: "Traditional Indian cuisine with authentic spices".into(),
                image: "https://images.unsplash.com/photo-1585937421612-70a008356fbe?w=400".into(),
                rating: 4.7,
                review_count: 189,
                cuisine: strings(&["Indian", "North Indian"]),
                delivery_time: "30-40 min".into(),
                delivery_fee: 15,
                minimum_order: 200,
                is_open: true,
                distance: "1.5 km".into(),
                tags: strings(&["Campus Favorite"]),
                promo: Some("Buy 1 Get 1".into()),
                is_favorite: None,
            },
            Restaurant {
                id: "4".into(),
                name: "Wok Express".into(),
                description: "Quick and delicious Chinese takeaway".into(),
                image: "https://images.unsplash.com/photo-1569718212165-3a8278d5f624?w=400".into(),
                rating: 4.5,
                review_count: 167,
                cuisine: strings(&["Chinese", "Asian"]),
                delivery_time: "15-25 min".into(),
                delivery_fee: 20,
                minimum_order: 120,
                is_open: true,
                distance: "0.5 km".into(),
                tags: strings(&["Quick Bites"]),
                promo: None,
                is_favorite: None,
            },
            Restaurant {
                id: "5".into(),
                name: "Green Bowl".into(),
                description: "Healthy salads and smoothie bowls".into(),
                image: "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?w=400".into(),
                rating: 4.9,
                review_count: 98,
                cuisine: strings(&["Healthy", "Salads"]),
                delivery_time: "15-20 min".into(),
                delivery_fee: 30,
                minimum_order: 180,
                is_open: true,
                distance: "1.0 km".into(),
                tags: strings(&["Healthy Choice"]),
                promo: None,
                is_favorite: None,
            },
        ]
    }

    fn item(
        id: &str,
        restaurant_id: &str,
        name: &str,
        description: &str,
        price: u32,
        category: &str,
        is_veg: bool,
    ) -> MenuItem {
        MenuItem {
            id: id.into(),
            restaurant_id: restaurant_id.into(),
            name: name.into(),
            description: description.into(),
            price,
            image: None,
            category: category.into(),
            is_veg,
            is_popular: None,
            is_bestseller: None,
            customizations: Vec::new(),
        }
    }

    /// The seeded menu items, across restaurants
    pub fn menu_items() -> Vec<MenuItem> {
        vec![
            MenuItem {
                image: Some(
                    "https://images.unsplash.com/photo-1574071318508-1cdbab80d002?w=300".into(),
                ),
                is_bestseller: Some(true),
                ..item(
                    "m1",
                    "1",
                    "Margherita Pizza",
                    "Classic tomato sauce, fresh mozzarella, basil leaves",
                    299,
                    "Pizzas",
                    true,
                )
            },
            MenuItem {
                image: Some(
                    "https://images.unsplash.com/photo-1628840042765-356cda07504e?w=300".into(),
                ),
                is_popular: Some(true),
                ..item(
                    "m2",
                    "1",
                    "Pepperoni Feast",
                    "Loaded with spicy pepperoni and extra cheese",
                    399,
                    "Pizzas",
                    false,
                )
            },
            MenuItem {
                image: Some(
                    "https://images.unsplash.com/photo-1619531040576-f9416740661b?w=300".into(),
                ),
                ..item(
                    "m3",
                    "1",
                    "Garlic Bread",
                    "Crispy bread with garlic butter and herbs",
                    129,
                    "Sides",
                    true,
                )
            },
            MenuItem {
                image: Some(
                    "https://images.unsplash.com/photo-1513104890138-7c749659a591?w=300".into(),
                ),
                is_popular: Some(true),
                customizations: vec![Customization {
                    id: "c1".into(),
                    name: "Crust".into(),
                    required: true,
                    max_selections: 1,
                    options: vec![
                        CustomizationOption { id: "c1o1".into(), name: "Classic".into(), price: 0 },
                        CustomizationOption {
                            id: "c1o2".into(),
                            name: "Extra Cheese Burst".into(),
                            price: 60,
                        },
                    ],
                }],
                ..item(
                    "m4",
                    "1",
                    "Cheese Burst",
                    "Extra cheese stuffed crust with your favorite toppings",
                    449,
                    "Pizzas",
                    true,
                )
            },
            MenuItem {
                image: Some(
                    "https://images.unsplash.com/photo-1645112411341-6c4fd023714a?w=300".into(),
                ),
                ..item(
                    "m5",
                    "1",
                    "Pasta Alfredo",
                    "Creamy white sauce pasta with mushrooms",
                    249,
                    "Pasta",
                    true,
                )
            },
            item(
                "m6",
                "1",
                "Cold Coffee",
                "Refreshing iced coffee with cream",
                99,
                "Beverages",
                true,
            ),
            MenuItem {
                is_bestseller: Some(true),
                customizations: vec![Customization {
                    id: "c2".into(),
                    name: "Extras".into(),
                    required: false,
                    max_selections: 2,
                    options: vec![
                        CustomizationOption {
                            id: "c2o1".into(),
                            name: "Extra Patty".into(),
                            price: 70,
                        },
                        CustomizationOption { id: "c2o2".into(), name: "Bacon".into(), price: 50 },
                    ],
                }],
                ..item(
                    "b1",
                    "2",
                    "Double Cheese Burger",
                    "Two smashed patties with melted cheddar",
                    189,
                    "Burgers",
                    false,
                )
            },
            item("b2", "2", "Masala Fries", "Crispy fries tossed in house spice", 99, "Sides", true),
            MenuItem {
                is_popular: Some(true),
                ..item(
                    "s1",
                    "3",
                    "Butter Chicken",
                    "Creamy tomato gravy with tandoori chicken",
                    320,
                    "Mains",
                    false,
                )
            },
            item("s2", "3", "Garlic Naan", "Tandoor-baked flatbread with garlic", 60, "Breads", true),
        ]
    }

    /// The seeded browse categories
    pub fn categories() -> Vec<Category> {
        vec![
            Category { id: "1".into(), name: "Pizza".into(), icon: "pizza".into(), image: None },
            Category { id: "2".into(), name: "Burger".into(), icon: "fast-food".into(), image: None },
            Category { id: "3".into(), name: "Indian".into(), icon: "flame".into(), image: None },
            Category { id: "4".into(), name: "Chinese".into(), icon: "restaurant".into(), image: None },
            Category { id: "5".into(), name: "Healthy".into(), icon: "leaf".into(), image: None },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_restaurants_mock() {
        let catalog = CatalogService::new();
        let restaurants = catalog.list_restaurants().await.unwrap();

        assert_eq!(restaurants.len(), 5);
        assert_eq!(restaurants[0].name, "Pizza Paradise");
    }

    #[tokio::test]
    async fn test_get_restaurant() {
        let catalog = CatalogService::new();

        let restaurant = catalog.get_restaurant("3").await.unwrap();
        assert_eq!(restaurant.name, "Spice Garden");

        let missing = catalog.get_restaurant("99").await;
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_matches_name_cuisine_and_tags() {
        let catalog = CatalogService::new();

        let by_name = catalog.search_restaurants("paradise").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "1");

        let by_cuisine = catalog.search_restaurants("indian").await.unwrap();
        assert_eq!(by_cuisine.len(), 1);
        assert_eq!(by_cuisine[0].id, "3");

        let by_tag = catalog.search_restaurants("healthy").await.unwrap();
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, "5");

        let none = catalog.search_restaurants("sushi").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_menu_is_scoped_to_restaurant() {
        let catalog = CatalogService::new();

        let pizza_menu = catalog.menu_for_restaurant("1").await.unwrap();
        assert_eq!(pizza_menu.len(), 6);
        assert!(pizza_menu.iter().all(|item| item.restaurant_id == "1"));

        let burger_menu = catalog.menu_for_restaurant("2").await.unwrap();
        assert_eq!(burger_menu.len(), 2);

        let unknown = catalog.menu_for_restaurant("99").await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_categories() {
        let catalog = CatalogService::new();
        let categories = catalog.list_categories().await.unwrap();
        assert_eq!(categories.len(), 5);
    }

    #[test]
    fn test_menu_item_serialization_shape() {
        let items = mock::menu_items();
        let cheese_burst = items.iter().find(|item| item.id == "m4").unwrap();

        let json = serde_json::to_value(cheese_burst).unwrap();
        assert_eq!(json["restaurantId"], "1");
        assert_eq!(json["isVeg"], true);
        assert_eq!(json["customizations"][0]["maxSelections"], 1);
    }
}
