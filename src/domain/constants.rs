/// 管理フォームから追加された Entry の商品 ID
pub const CUSTOM_PRODUCT_ID: &str = "custom";
/// 管理フォームから追加された Entry の価格表示
pub const CUSTOM_PRODUCT_PRICE: &str = "N/A";

const SHIKAARVANI_PRODUCT_ID: &str = "1318";
const SHIKAARVANI_NAME: &str = "Shikaarvani Bodycon Dress";
const SHIKAARVANI_IMAGE_URL: &str = "https://qamell.in/wp-content/uploads/2024/07/timelessknots-qamell-shikaarvani-bodycon-dress-for-women-by-qamell-2.jpg";
const SHIKAARVANI_LINK: &str =
    "https://qamell.in/shop/shop-by-theme/timelessknots/shikaarvani-bodycon-women-qamell/";
const SHIKAARVANI_PRICE: &str = "₹1,299";

/// 組み込みのシード Entry の元データ
pub struct SeedRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub coords: [f64; 2],
    pub product_id: &'static str,
    pub product_name: &'static str,
    pub product_image_url: &'static str,
    pub product_link: &'static str,
    pub price: &'static str,
    pub review: &'static str,
    pub rating: f64,
    pub user_image: &'static str,
}

pub const SEED_RECORDS: [SeedRecord; 2] = [
    SeedRecord {
        id: "1",
        name: "Priya Sharma",
        coords: [12.9716, 77.5946],
        product_id: SHIKAARVANI_PRODUCT_ID,
        product_name: SHIKAARVANI_NAME,
        product_image_url: SHIKAARVANI_IMAGE_URL,
        product_link: SHIKAARVANI_LINK,
        price: SHIKAARVANI_PRICE,
        review: "I am absolutely in love with this dress! The bodycon fit is incredibly flattering.",
        rating: 5.0,
        user_image: "https://i.im.ge/2025/10/18/nRdIyK.Untitled-design.png",
    },
    SeedRecord {
        id: "2",
        name: "Sneha Reddy",
        coords: [17.3850, 78.4867],
        product_id: SHIKAARVANI_PRODUCT_ID,
        product_name: SHIKAARVANI_NAME,
        product_image_url: SHIKAARVANI_IMAGE_URL,
        product_link: SHIKAARVANI_LINK,
        price: SHIKAARVANI_PRICE,
        review: "Wore this dress to a friend's party and felt like a showstopper!",
        rating: 5.0,
        user_image: "https://i.im.ge/2025/10/30/nk8QTY.From-Root-to-Runway-1.png",
    },
];
