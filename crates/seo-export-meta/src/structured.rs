//! schema.org JSON-LD builders.

use serde_json::{Value, json};

/// Input for an `Article` payload.
#[derive(Debug, Clone, Default)]
pub struct ArticleData {
    pub headline: String,
    pub image: String,
    pub date_published: String,
    /// Falls back to `date_published` when absent.
    pub date_modified: Option<String>,
    pub author: String,
    pub publisher: String,
    pub publisher_logo: String,
    pub description: String,
}

/// Input for a `LocalBusiness` payload.
#[derive(Debug, Clone, Default)]
pub struct LocalBusinessData {
    pub name: String,
    pub image: String,
    pub telephone: String,
    pub address: String,
    pub price_range: String,
    pub description: String,
}

/// Input for a `Product` payload.
#[derive(Debug, Clone, Default)]
pub struct ProductData {
    pub name: String,
    pub image: String,
    pub description: String,
    pub brand: String,
    pub price: String,
    pub currency: String,
    /// schema.org availability name, e.g. "InStock".
    pub availability: String,
}

/// Build an `Article` payload.
pub fn article(data: &ArticleData) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": data.headline,
        "image": data.image,
        "datePublished": data.date_published,
        "dateModified": data.date_modified.as_deref().unwrap_or(&data.date_published),
        "author": {
            "@type": "Person",
            "name": data.author,
        },
        "publisher": {
            "@type": "Organization",
            "name": data.publisher,
            "logo": {
                "@type": "ImageObject",
                "url": data.publisher_logo,
            },
        },
        "description": data.description,
    })
}

/// Build a `LocalBusiness` payload.
pub fn local_business(data: &LocalBusinessData) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "name": data.name,
        "image": data.image,
        "telephone": data.telephone,
        "address": {
            "@type": "PostalAddress",
            "streetAddress": data.address,
        },
        "priceRange": data.price_range,
        "description": data.description,
    })
}

/// Build a `Product` payload.
pub fn product(data: &ProductData) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "name": data.name,
        "image": data.image,
        "description": data.description,
        "brand": {
            "@type": "Brand",
            "name": data.brand,
        },
        "offers": {
            "@type": "Offer",
            "price": data.price,
            "priceCurrency": data.currency,
            "availability": format!("https://schema.org/{}", data.availability),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_defaults_modified_date() {
        let value = article(&ArticleData {
            headline: "Launch".to_string(),
            date_published: "2026-01-14".to_string(),
            author: "Ada".to_string(),
            ..ArticleData::default()
        });

        assert_eq!(value["@type"], "Article");
        assert_eq!(value["dateModified"], "2026-01-14");
        assert_eq!(value["author"]["name"], "Ada");
    }

    #[test]
    fn test_local_business_address() {
        let value = local_business(&LocalBusinessData {
            name: "Cafe".to_string(),
            address: "1 Main St".to_string(),
            ..LocalBusinessData::default()
        });

        assert_eq!(value["address"]["@type"], "PostalAddress");
        assert_eq!(value["address"]["streetAddress"], "1 Main St");
    }

    #[test]
    fn test_product_availability_url() {
        let value = product(&ProductData {
            name: "Widget".to_string(),
            price: "9.99".to_string(),
            currency: "EUR".to_string(),
            availability: "InStock".to_string(),
            ..ProductData::default()
        });

        assert_eq!(value["offers"]["availability"], "https://schema.org/InStock");
        assert_eq!(value["offers"]["priceCurrency"], "EUR");
    }
}
