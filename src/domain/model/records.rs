use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::age::age_label;

/// Any record stored in a collection. Ids are unique within their collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

/// A cat available for adoption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    pub id: i64,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub breed: String,
    pub gender: Gender,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub personality: Vec<String>,
}

impl Cat {
    /// Display age ("2 Years", "5 Months") as of `today`.
    pub fn age_label(&self, today: chrono::NaiveDate) -> Option<String> {
        age_label(&self.date_of_birth, today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub feedback: String,
    pub image: String,
}

/// A boarding or grooming offer. `price` is free text ("$35/night").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One picture in the about or facility gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: i64,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> i64 {
                    self.id
                }

                fn set_id(&mut self, id: i64) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_record!(Cat, Testimonial, Service, GalleryItem);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cat_wire_format_is_camel_case() {
        let cat: Cat = serde_json::from_value(json!({
            "id": 7,
            "name": "Oliver",
            "dateOfBirth": "2024-10-08",
            "breed": "Tabby",
            "gender": "Male",
            "image": "https://example.com/oliver.jpg",
            "personality": ["Playful"]
        }))
        .unwrap();
        assert_eq!(cat.images, None);

        let back = serde_json::to_value(&cat).unwrap();
        assert_eq!(back["dateOfBirth"], "2024-10-08");
        assert!(back.get("images").is_none());
    }

    #[test]
    fn gallery_caption_is_optional() {
        let item: GalleryItem =
            serde_json::from_value(json!({ "id": 1, "image": "a.jpg" })).unwrap();
        assert_eq!(item.caption, None);
    }
}
