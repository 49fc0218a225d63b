//! Product catalog, categories and filament colors.
//!
//! Prices are integer cents.

use serde::Serialize;
use std::fmt;

/// A product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Identifier; `all` matches every product.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Emoji icon.
    pub icon: &'static str,
}

/// A filament color and its upcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    /// Display name, also the key stored in cart items.
    pub name: &'static str,
    /// CSS color or gradient.
    pub hex: &'static str,
    /// Upcharge per item in cents.
    pub upcharge_cents: u32,
    /// The house color.
    pub featured: bool,
    /// Silk and other specialty filaments.
    pub premium: bool,
}

impl Color {
    /// `Free` or `+$X.YY`.
    #[must_use]
    pub fn upcharge_text(&self) -> String {
        if self.upcharge_cents == 0 {
            "Free".to_string()
        } else {
            format!("+{}", format_price(self.upcharge_cents))
        }
    }
}

/// How hard a product is to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    /// Prints reliably on any printer.
    Easy,
    /// Needs a tuned printer.
    Medium,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
        })
    }
}

/// Something the shop prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short blurb.
    pub description: &'static str,
    /// Base price in cents.
    pub price_cents: u32,
    /// Category id.
    pub category: &'static str,
    /// Approximate print time.
    pub print_time: &'static str,
    /// Print difficulty.
    pub difficulty: Difficulty,
    /// Emoji shown instead of a photo.
    pub image: &'static str,
    /// Featured on the front page.
    pub popular: bool,
}

impl Product {
    /// Price of one item in `color`, in cents.
    #[must_use]
    pub const fn price_in(&self, color: &Color) -> u32 {
        self.price_cents + color.upcharge_cents
    }
}

/// Category id that matches every product.
pub const ALL_CATEGORY: &str = "all";

const CATEGORIES: &[Category] = &[
    Category { id: ALL_CATEGORY, name: "All Products", icon: "🛒" },
    Category { id: "tech", name: "Tech", icon: "💻" },
    Category { id: "school", name: "School", icon: "📚" },
    Category { id: "accessories", name: "Accessories", icon: "🔑" },
    Category { id: "home", name: "Home", icon: "🏠" },
    Category { id: "toys", name: "Toys", icon: "🎮" },
];

const fn color(name: &'static str, hex: &'static str, upcharge_cents: u32) -> Color {
    Color {
        name,
        hex,
        upcharge_cents,
        featured: false,
        premium: false,
    }
}

const COLORS: &[Color] = &[
    color("Gray", "#6B7280", 0),
    color("White", "#F3F4F6", 0),
    color("Black", "#1F2937", 0),
    color("Red", "#EF4444", 50),
    color("Blue", "#3B82F6", 50),
    color("Green", "#22C55E", 50),
    Color {
        featured: true,
        ..color("Yellow", "#F5C518", 100)
    },
    color("Purple", "#8B5CF6", 100),
    Color {
        premium: true,
        ..color(
            "Rainbow Silk",
            "linear-gradient(135deg, #EF4444, #F59E0B, #22C55E, #3B82F6, #8B5CF6)",
            150,
        )
    },
];

const PRODUCTS: &[Product] = &[
    Product {
        id: "phone-stand",
        name: "Phone Stand",
        description: "Keep your phone propped up for videos and calls. Adjustable angle design.",
        price_cents: 500,
        category: "tech",
        print_time: "45 min",
        difficulty: Difficulty::Easy,
        image: "📱",
        popular: true,
    },
    Product {
        id: "pencil-holder",
        name: "Pencil Holder",
        description: "Hexagonal design holds pencils, pens, and markers. Perfect for your desk!",
        price_cents: 400,
        category: "school",
        print_time: "1 hr",
        difficulty: Difficulty::Easy,
        image: "✏️",
        popular: false,
    },
    Product {
        id: "cable-organizer",
        name: "Cable Organizer",
        description: "Stop cable chaos! Clips to your desk edge to manage charging cables.",
        price_cents: 300,
        category: "tech",
        print_time: "30 min",
        difficulty: Difficulty::Easy,
        image: "🔌",
        popular: false,
    },
    Product {
        id: "custom-keychain",
        name: "Custom Keychain",
        description: "Show your style with a custom keychain. Great for backpacks and keys!",
        price_cents: 250,
        category: "accessories",
        print_time: "15 min",
        difficulty: Difficulty::Easy,
        image: "🔑",
        popular: true,
    },
    Product {
        id: "bookmark-set",
        name: "Bookmark Set",
        description: "Set of 3 corner bookmarks. Never lose your page again!",
        price_cents: 150,
        category: "school",
        print_time: "20 min",
        difficulty: Difficulty::Easy,
        image: "📖",
        popular: false,
    },
    Product {
        id: "mini-planter",
        name: "Mini Planter",
        description: "Cute geometric planter for succulents or small plants. Includes drainage hole.",
        price_cents: 600,
        category: "home",
        print_time: "1.5 hr",
        difficulty: Difficulty::Medium,
        image: "🌱",
        popular: false,
    },
    Product {
        id: "fidget-cube",
        name: "Fidget Cube",
        description: "Satisfying clicking and spinning sides. Great for focus and stress relief!",
        price_cents: 450,
        category: "toys",
        print_time: "2 hr",
        difficulty: Difficulty::Medium,
        image: "🎲",
        popular: true,
    },
    Product {
        id: "headphone-hook",
        name: "Headphone Hook",
        description: "Mount under your desk to hang headphones. Clean setup vibes!",
        price_cents: 350,
        category: "tech",
        print_time: "40 min",
        difficulty: Difficulty::Easy,
        image: "🎧",
        popular: false,
    },
];

/// All categories, `all` first.
#[must_use]
pub const fn categories() -> &'static [Category] {
    CATEGORIES
}

/// All colors, cheapest first.
#[must_use]
pub const fn colors() -> &'static [Color] {
    COLORS
}

/// All products.
#[must_use]
pub const fn products() -> &'static [Product] {
    PRODUCTS
}

/// Products in a category. `all` returns every product.
#[must_use]
pub fn products_by_category(category: &str) -> Vec<&'static Product> {
    PRODUCTS
        .iter()
        .filter(|p| category == ALL_CATEGORY || p.category == category)
        .collect()
}

/// Looks up a product.
#[must_use]
pub fn product_by_id(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Looks up a color by name, ignoring case.
#[must_use]
pub fn color_by_name(name: &str) -> Option<&'static Color> {
    COLORS.iter().find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

/// The cheapest default color.
#[must_use]
pub fn default_color() -> &'static Color {
    &COLORS[0]
}

/// Products shown on the front page.
#[must_use]
pub fn popular_products() -> Vec<&'static Product> {
    PRODUCTS.iter().filter(|p| p.popular).collect()
}

/// Formats cents as `$X.YY`.
#[must_use]
pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "$0.00");
        assert_eq!(format_price(250), "$2.50");
        assert_eq!(format_price(1205), "$12.05");
    }

    #[test]
    fn test_by_category() {
        assert_eq!(products_by_category("all").len(), products().len());
        let tech: Vec<_> = products_by_category("tech").iter().map(|p| p.id).collect();
        assert_eq!(tech, vec!["phone-stand", "cable-organizer", "headphone-hook"]);
        assert!(products_by_category("garden").is_empty());
    }

    #[test]
    fn test_popular() {
        let ids: Vec<_> = popular_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["phone-stand", "custom-keychain", "fidget-cube"]);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(product_by_id("mini-planter").unwrap().price_cents, 600);
        assert!(product_by_id("rocket").is_none());
        assert_eq!(color_by_name("rainbow silk").unwrap().upcharge_cents, 150);
        assert!(color_by_name("Yellow").unwrap().featured);
        assert_eq!(default_color().name, "Gray");
    }

    #[test]
    fn test_upcharge_text() {
        assert_eq!(color_by_name("Black").unwrap().upcharge_text(), "Free");
        assert_eq!(color_by_name("Red").unwrap().upcharge_text(), "+$0.50");
    }

    #[test]
    fn test_price_in_color() {
        let stand = product_by_id("phone-stand").unwrap();
        assert_eq!(stand.price_in(color_by_name("Purple").unwrap()), 600);
    }

    #[test]
    fn test_every_product_has_a_category() {
        for product in products() {
            assert!(categories().iter().any(|c| c.id == product.category));
        }
    }
}
