//! Schema catalog for the demo API's domain payloads
//!
//! The domain records (items, offers, images, users) are data, not behavior:
//! each exists only as a group of field specifications interpreted by the
//! engine. Schemas are built once and shared; they are immutable after
//! construction.

use crate::core::schema::{FieldSpec, FieldType, Schema, Source};
use serde_json::json;
use std::sync::OnceLock;

const URL_PATTERN: &str = r"^https?://[^\s/$.?#].[^\s]*$";

/// The model enumeration used by the `/models/{model_name}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelName {
    Alexnet,
    Resnet,
    Lenet,
}

impl ModelName {
    /// String-value table, in declaration order
    pub const MEMBERS: [&'static str; 3] = ["alexnet", "resnet", "lenet"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Alexnet => "alexnet",
            ModelName::Resnet => "resnet",
            ModelName::Lenet => "lenet",
        }
    }

    /// Look up a member by its string value (case-sensitive)
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "alexnet" => Some(ModelName::Alexnet),
            "resnet" => Some(ModelName::Resnet),
            "lenet" => Some(ModelName::Lenet),
            _ => None,
        }
    }
}

/// An image nested inside an item: url + display name
pub fn image() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("image")
            .field(FieldSpec::new("url", Source::Body, FieldType::String).pattern(URL_PATTERN))
            .field(FieldSpec::new("name", Source::Body, FieldType::String))
    })
}

/// The item body: name, optional description, strictly positive price,
/// optional tax, optional tag list, optional image list
pub fn item_body() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("item")
            .field(FieldSpec::new("name", Source::Body, FieldType::String).max_length(50))
            .field(FieldSpec::new("description", Source::Body, FieldType::String).optional())
            .field(FieldSpec::new("price", Source::Body, FieldType::Float).gt(0.0))
            .field(FieldSpec::new("tax", Source::Body, FieldType::Float).optional())
            .field(
                FieldSpec::new(
                    "tags",
                    Source::Body,
                    FieldType::List(Box::new(FieldSpec::new(
                        "tags",
                        Source::Body,
                        FieldType::String,
                    ))),
                )
                .optional(),
            )
            .field(
                FieldSpec::new(
                    "images",
                    Source::Body,
                    FieldType::List(Box::new(FieldSpec::new(
                        "images",
                        Source::Body,
                        FieldType::Object(image().clone()),
                    ))),
                )
                .optional(),
            )
    })
}

/// An offer bundling several items under one price
pub fn offer_body() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("offer")
            .field(FieldSpec::new("name", Source::Body, FieldType::String))
            .field(FieldSpec::new("description", Source::Body, FieldType::String).optional())
            .field(FieldSpec::new("price", Source::Body, FieldType::Float).gt(0.0))
            .field(FieldSpec::new(
                "items",
                Source::Body,
                FieldType::List(Box::new(FieldSpec::new(
                    "items",
                    Source::Body,
                    FieldType::Object(item_body().clone()),
                ))),
            ))
    })
}

/// The user creation body; the password is validated but never echoed
pub fn user_body() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("user")
            .field(FieldSpec::new("username", Source::Body, FieldType::String).min_length(3))
            .field(FieldSpec::new("full_name", Source::Body, FieldType::String).optional())
            .field(FieldSpec::new("password", Source::Body, FieldType::String).min_length(8))
    })
}

/// The login form: both fields required, extracted from urlencoded form data
pub fn login_form() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("login")
            .field(FieldSpec::new("username", Source::Form, FieldType::String))
            .field(FieldSpec::new("password", Source::Form, FieldType::String))
    })
}

/// Path + query spec for `GET /items/{item_id}`
pub fn read_item() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("read_item")
            .field(FieldSpec::new("item_id", Source::Path, FieldType::Integer))
            .field(
                FieldSpec::new("q", Source::Query, FieldType::String)
                    .optional()
                    .min_length(3)
                    .max_length(50)
                    .pattern("^fixedquery$"),
            )
            .field(FieldSpec::new("p", Source::Query, FieldType::String).min_length(3))
            .field(
                FieldSpec::new(
                    "r",
                    Source::Query,
                    FieldType::List(Box::new(FieldSpec::new(
                        "r",
                        Source::Query,
                        FieldType::String,
                    ))),
                )
                .optional(),
            )
            .field(FieldSpec::new("skip", Source::Query, FieldType::Integer).default_value(json!(0)))
            .field(
                FieldSpec::new("limit", Source::Query, FieldType::Integer).default_value(json!(10)),
            )
            .field(
                FieldSpec::new("short", Source::Query, FieldType::Boolean)
                    .default_value(json!(false)),
            )
    })
}

/// Path + body spec for `PUT /items/{item_id}`
pub fn update_item() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("update_item")
            .field(FieldSpec::new("item_id", Source::Path, FieldType::Integer))
            .field(FieldSpec::new("q", Source::Query, FieldType::String).optional())
            .extend(item_body())
    })
}

/// Path + body spec for `PUT /items/{item_id}/images`
pub fn update_item_images() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("update_item_images")
            .field(FieldSpec::new("item_id", Source::Path, FieldType::Integer))
            .field(FieldSpec::new(
                "images",
                Source::Body,
                FieldType::List(Box::new(FieldSpec::new(
                    "images",
                    Source::Body,
                    FieldType::Object(image().clone()),
                ))),
            ))
    })
}

/// Enum-constrained path spec for `GET /models/{model_name}`
pub fn get_model() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("get_model").field(FieldSpec::new(
            "model_name",
            Source::Path,
            FieldType::Enum(ModelName::MEMBERS.to_vec()),
        ))
    })
}

/// Header/cookie spec for `GET /client-meta/`
pub fn client_meta() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new("client_meta")
            .field(FieldSpec::new("user-agent", Source::Header, FieldType::String).optional())
            .field(FieldSpec::new("ads_id", Source::Cookie, FieldType::String).optional())
    })
}
