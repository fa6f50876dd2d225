//! Core Operation types for `forms.batchUpdate`

use serde::{Deserialize, Serialize};

use crate::api::models::{Form, FormInfo, FormSettings, Item};

/// A single write operation inside a batch update request.
///
/// Serialized externally tagged, e.g. `{"createItem": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Replace masked fields of the form's title/description block
    UpdateFormInfo(UpdateFormInfo),
    /// Replace masked form settings
    UpdateSettings(UpdateSettings),
    /// Insert a new item at a position
    CreateItem(CreateItem),
    /// Replace masked fields of the item at a position
    UpdateItem(UpdateItem),
    /// Remove the item at a position
    DeleteItem(DeleteItem),
    /// Move an item between positions
    MoveItem(MoveItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInfo {
    pub info: FormInfo,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    pub settings: FormSettings,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItem {
    pub item: Item,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub item: Item,
    pub location: Location,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItem {
    pub original_location: Location,
    pub new_location: Location,
}

/// Body of `forms.batchUpdate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_form_in_response: Option<bool>,
}

/// Result of `forms.batchUpdate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
}

impl Operation {
    /// Create a new UpdateFormInfo operation for the given mask
    pub fn update_form_info(info: FormInfo, update_mask: impl Into<String>) -> Self {
        Self::UpdateFormInfo(UpdateFormInfo {
            info,
            update_mask: update_mask.into(),
        })
    }

    /// Create a new UpdateSettings operation
    pub fn update_settings(settings: FormSettings, update_mask: impl Into<String>) -> Self {
        Self::UpdateSettings(UpdateSettings {
            settings,
            update_mask: update_mask.into(),
        })
    }

    /// Create a new CreateItem operation
    pub fn create_item(item: Item, index: usize) -> Self {
        Self::CreateItem(CreateItem {
            item,
            location: Location { index },
        })
    }

    /// Create a new UpdateItem operation
    pub fn update_item(item: Item, index: usize, update_mask: impl Into<String>) -> Self {
        Self::UpdateItem(UpdateItem {
            item,
            location: Location { index },
            update_mask: update_mask.into(),
        })
    }

    /// Create a new DeleteItem operation
    pub fn delete_item(index: usize) -> Self {
        Self::DeleteItem(DeleteItem {
            location: Location { index },
        })
    }

    /// Create a new MoveItem operation
    pub fn move_item(from: usize, to: usize) -> Self {
        Self::MoveItem(MoveItem {
            original_location: Location { index: from },
            new_location: Location { index: to },
        })
    }

    /// Get the operation type as it appears on the wire
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::UpdateFormInfo(_) => "updateFormInfo",
            Self::UpdateSettings(_) => "updateSettings",
            Self::CreateItem(_) => "createItem",
            Self::UpdateItem(_) => "updateItem",
            Self::DeleteItem(_) => "deleteItem",
            Self::MoveItem(_) => "moveItem",
        }
    }

    pub fn is_create_item(&self) -> bool {
        matches!(self, Self::CreateItem(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_wire_shape() {
        let op = Operation::move_item(3, 0);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"moveItem": {"originalLocation": {"index": 3}, "newLocation": {"index": 0}}})
        );

        let op = Operation::update_form_info(
            FormInfo {
                description: Some("Hello".to_string()),
                ..FormInfo::default()
            },
            "description",
        );
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"updateFormInfo": {"info": {"description": "Hello"}, "updateMask": "description"}})
        );
    }

    #[test]
    fn test_operation_properties() {
        let create = Operation::create_item(Item::default(), 2);
        assert_eq!(create.operation_type(), "createItem");
        assert!(create.is_create_item());

        let delete = Operation::delete_item(1);
        assert_eq!(delete.operation_type(), "deleteItem");
        assert!(!delete.is_create_item());
    }
}
