use crate::domain::value_objects::{Coordinates, EntryId, Rating};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 空文字列と欠落を同一視して `None` に正規化する。
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(optional_text(value))
}

/// 商品情報。保存形式は元の平坦なキー（`productId` など）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        rename = "productId",
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<String>,
    #[serde(
        rename = "productName",
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(
        rename = "productImageUrl",
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    image_url: Option<String>,
    #[serde(
        rename = "productLink",
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    link: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    price: Option<String>,
}

impl Product {
    pub fn new(
        id: Option<String>,
        name: Option<String>,
        image_url: Option<String>,
        link: Option<String>,
        price: Option<String>,
    ) -> Self {
        Self {
            id: optional_text(id),
            name: optional_text(name),
            image_url: optional_text(image_url),
            link: optional_text(link),
            price: optional_text(price),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }
}

/// レビュー情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        rename = "review",
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    comment: Option<String>,
    #[serde(default)]
    rating: Rating,
    #[serde(
        rename = "userImage",
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    user_image: Option<String>,
}

impl Review {
    pub fn new(comment: Option<String>, rating: Rating, user_image: Option<String>) -> Self {
        Self {
            comment: optional_text(comment),
            rating,
            user_image: optional_text(user_image),
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// data URI または外部 URL
    pub fn user_image(&self) -> Option<&str> {
        self.user_image.as_deref()
    }
}

/// 描画できないレコードの理由
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedEntry {
    EmptyId,
    InvalidCoordinates(Coordinates),
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedEntry::EmptyId => write!(f, "entry id is empty"),
            MalformedEntry::InvalidCoordinates(coords) => {
                write!(f, "entry coordinates are invalid: {coords}")
            }
        }
    }
}

/// 購入・レビュー 1 件分の記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    id: EntryId,
    #[serde(rename = "name", default)]
    display_name: String,
    #[serde(rename = "coords")]
    coordinates: Coordinates,
    #[serde(flatten)]
    product: Product,
    #[serde(flatten)]
    review: Review,
}

impl Entry {
    /// 新しい識別子で Entry を作成する。
    pub fn new(
        display_name: impl Into<String>,
        coordinates: Coordinates,
        product: Product,
        review: Review,
    ) -> Self {
        Self::from_parts(EntryId::generate(), display_name, coordinates, product, review)
    }

    /// 既存レコードから Entry を復元する。
    pub fn from_parts(
        id: EntryId,
        display_name: impl Into<String>,
        coordinates: Coordinates,
        product: Product,
        review: Review,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            coordinates,
            product,
            review,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    pub fn validate(&self) -> Result<(), MalformedEntry> {
        if self.id.is_empty() {
            return Err(MalformedEntry::EmptyId);
        }
        if !self.coordinates.is_valid() {
            return Err(MalformedEntry::InvalidCoordinates(self.coordinates));
        }
        Ok(())
    }
}

/// 追加順を保持する Entry の列。永続化の単位。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryCollection(Vec<Entry>);

impl EntryCollection {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self(entries)
    }

    /// 末尾に `entry` を加えた新しいコレクションを返す。
    pub fn with_appended(&self, entry: Entry) -> Self {
        let mut entries = self.0.clone();
        entries.push(entry);
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Entry] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a EntryCollection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Entry>> for EntryCollection {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}
