//! Built-in first-run content, used when neither a remote backend nor the
//! local cache has anything for a collection.

use super::collections::Collections;
use super::records::{Cat, GalleryItem, Gender, Service, Testimonial};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn cat(
    id: i64,
    name: &str,
    dob: &str,
    breed: &str,
    gender: Gender,
    image: &str,
    personality: &[&str],
) -> Cat {
    Cat {
        id,
        name: name.to_string(),
        date_of_birth: dob.to_string(),
        breed: breed.to_string(),
        gender,
        image: image.to_string(),
        images: None,
        personality: strings(personality),
    }
}

fn photo(id: i64, image: &str, caption: Option<&str>) -> GalleryItem {
    GalleryItem {
        id,
        image: image.to_string(),
        caption: caption.map(str::to_string),
    }
}

pub fn default_cats() -> Vec<Cat> {
    vec![
        cat(
            1,
            "Mochi",
            "2022-12-08",
            "Scottish Fold",
            Gender::Female,
            "https://images.unsplash.com/photo-1573865526739-10659fec78a5?auto=format&fit=crop&q=80&w=800",
            &["Playful", "Cuddly"],
        ),
        cat(
            2,
            "Luna",
            "2024-06-08",
            "Domestic Short Hair",
            Gender::Female,
            "https://images.unsplash.com/photo-1514888286974-6c03e2ca1dba?auto=format&fit=crop&q=80&w=800",
            &["Curious", "Energetic"],
        ),
        cat(
            3,
            "Garfield",
            "2019-12-08",
            "Persian",
            Gender::Male,
            "https://images.unsplash.com/photo-1574158622682-e40e69881006?auto=format&fit=crop&q=80&w=800",
            &["Lazy", "Foodie", "Chill"],
        ),
        cat(
            4,
            "Shadow",
            "2023-12-08",
            "Bombay",
            Gender::Male,
            "https://images.unsplash.com/photo-1513245543132-31f507417b26?auto=format&fit=crop&q=80&w=800",
            &["Mysterious", "Quiet"],
        ),
        cat(
            5,
            "Sunny",
            "2021-12-08",
            "Maine Coon",
            Gender::Male,
            "https://images.unsplash.com/photo-1533738363-b7f9aef128ce?auto=format&fit=crop&q=80&w=800",
            &["Gentle Giant", "Friendly"],
        ),
        cat(
            6,
            "Bella",
            "2020-12-08",
            "Siamese",
            Gender::Female,
            "https://images.unsplash.com/photo-1513360371669-4adf3dd7dff8?auto=format&fit=crop&q=80&w=800",
            &["Vocal", "Intelligent"],
        ),
        cat(
            7,
            "Oliver",
            "2024-10-08",
            "Tabby",
            Gender::Male,
            "https://images.unsplash.com/photo-1519052537078-e6302a4968ef?auto=format&fit=crop&q=80&w=800",
            &["Playful", "Tiny"],
        ),
        cat(
            8,
            "Cleo",
            "2017-12-08",
            "Sphynx",
            Gender::Female,
            "https://images.unsplash.com/photo-1516280030429-27679b3dc9cf?auto=format&fit=crop&q=80&w=800",
            &["Affectionate", "Warm"],
        ),
    ]
}
pub fn default_testimonials() -> Vec<Testimonial> {
    let t = |id: i64, name: &str, role: &str, feedback: &str, image: &str| Testimonial {
        id,
        name: name.to_string(),
        role: role.to_string(),
        feedback: feedback.to_string(),
        image: image.to_string(),
    };
    vec![
        t(
            1,
            "Sarah Jenkins",
            "Cat Mom of 2",
            "The best place for my Mochi! She came back so happy and well-groomed. The daily updates gave me so much peace of mind.",
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?auto=format&fit=crop&q=80&w=200",
        ),
        t(
            2,
            "David Chen",
            "Frequent Traveler",
            "I never worry when I travel for work. The team at Cats & Cozy treats Oliver like their own. Highly recommended!",
            "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?auto=format&fit=crop&q=80&w=200",
        ),
        t(
            3,
            "Emily Wilson",
            "Adopter",
            "We found our perfect match here. The adoption process was thorough and caring. Luna is the light of our lives!",
            "https://images.unsplash.com/photo-1544005313-94ddf0286df2?auto=format&fit=crop&q=80&w=200",
        ),
        t(
            4,
            "Jessica Lee",
            "First Time Owner",
            "The staff were so helpful in guiding me through my first adoption. They really care about the cats.",
            "https://images.unsplash.com/photo-1517841905240-472988babdf9?auto=format&fit=crop&q=80&w=200",
        ),
    ]
}

pub fn default_services() -> Vec<Service> {
    let s = |id: i64, title: &str, price: &str, description: &str, icon: &str, images: &[&str]| Service {
        id,
        title: title.to_string(),
        price: price.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        images: strings(images),
    };
    vec![
        s(
            1,
            "Cozy Suite",
            "$35/night",
            "Private suite with window view, soft bedding, and daily playtime.",
            "bed",
            &[
                "https://images.unsplash.com/photo-1541781777631-faaf8221835f?auto=format&fit=crop&q=80&w=800",
                "https://images.unsplash.com/photo-1513245543132-31f507417b26?auto=format&fit=crop&q=80&w=800",
            ],
        ),
        s(
            2,
            "Royal Treatment",
            "$55/night",
            "Larger suite, gourmet treats, grooming session, and video calls.",
            "crown",
            &[
                "https://images.unsplash.com/photo-1596272875729-ed2ff7d6d9c5?auto=format&fit=crop&q=80&w=800",
                "https://images.unsplash.com/photo-1514888286974-6c03e2ca1dba?auto=format&fit=crop&q=80&w=800",
                "https://images.unsplash.com/photo-1519052537078-e6302a4968ef?auto=format&fit=crop&q=80&w=800",
            ],
        ),
        s(
            3,
            "Daycare",
            "$25/day",
            "Social play for active cats. Perfect for busy work days.",
            "sun",
            &[
                "https://images.unsplash.com/photo-1545249390-6bdfa286032f?auto=format&fit=crop&q=80&w=800",
                "https://images.unsplash.com/photo-1533738363-b7f9aef128ce?auto=format&fit=crop&q=80&w=800",
            ],
        ),
    ]
}

pub fn default_about_gallery() -> Vec<GalleryItem> {
    [
        "1511044568932-33842851211d",
        "1608848461950-0fe51dfc41cb",
        "1535268647677-300dbf3d78d1",
        "1574158622682-e40e69881006",
        "1495360019602-e001c276375f",
        "1514888286974-6c03e2ca1dba",
        "1519052537078-e6302a4968ef",
        "1533738363-b7f9aef128ce",
        "1513360371669-4adf3dd7dff8",
    ]
    .iter()
    .enumerate()
    .map(|(i, photo_id)| {
        let url = format!(
            "https://images.unsplash.com/photo-{}?auto=format&fit=crop&q=80&w=1000",
            photo_id
        );
        photo(i as i64 + 1, &url, None)
    })
    .collect()
}

pub fn default_facility_gallery() -> Vec<GalleryItem> {
    vec![
        photo(
            1,
            "https://images.unsplash.com/photo-1545249390-6bdfa286032f?auto=format&fit=crop&q=80&w=800",
            Some("Spacious Play Area"),
        ),
        photo(
            2,
            "https://images.unsplash.com/photo-1541781774459-bb2af2f05b55?auto=format&fit=crop&q=80&w=800",
            Some("Cozy Private Suites"),
        ),
        photo(
            3,
            "https://images.unsplash.com/photo-1596272875729-ed2ff7d6d9c5?auto=format&fit=crop&q=80&w=800",
            Some("Luxury Lounging Spots"),
        ),
        photo(
            4,
            "https://images.unsplash.com/photo-1548802673-380ab8ebc7b7?auto=format&fit=crop&q=80&w=800",
            Some("Climate Controlled Rooms"),
        ),
        photo(
            5,
            "https://images.unsplash.com/photo-1573865526739-10659fec78a5?auto=format&fit=crop&q=80&w=800",
            Some("Happy Residents"),
        ),
        photo(
            6,
            "https://images.unsplash.com/photo-1511044568932-33842851211d?auto=format&fit=crop&q=80&w=800",
            Some("Safe & Secure Environment"),
        ),
    ]
}

impl Collections {
    /// The built-in content shipped with the site.
    pub fn defaults() -> Self {
        Self {
            cats: default_cats(),
            testimonials: default_testimonials(),
            services: default_services(),
            about_gallery: default_about_gallery(),
            facility_gallery: default_facility_gallery(),
        }
    }
}
