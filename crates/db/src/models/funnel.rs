//! Funnel row model and DTOs.

use sqlx::types::Json;
use sqlx::FromRow;

use kickflip_core::element_list::ElementList;
use kickflip_core::funnel::Funnel;
use kickflip_core::types::{DbId, Timestamp};

/// A row from the `funnels` table. The element list is stored as JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct FunnelRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub elements: Json<ElementList>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<FunnelRow> for Funnel {
    fn from(row: FunnelRow) -> Self {
        Funnel {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            elements: row.elements.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for inserting a funnel.
#[derive(Debug, Clone)]
pub struct CreateFunnel {
    pub name: String,
    pub description: String,
    pub elements: ElementList,
    pub created_at: Timestamp,
}

/// DTO for replacing a stored funnel's content.
#[derive(Debug, Clone)]
pub struct UpdateFunnel {
    pub name: String,
    pub description: String,
    pub elements: ElementList,
}

impl From<&Funnel> for CreateFunnel {
    fn from(funnel: &Funnel) -> Self {
        Self {
            name: funnel.name.clone(),
            description: funnel.description.clone(),
            elements: funnel.elements.clone(),
            created_at: funnel.created_at,
        }
    }
}

impl From<&Funnel> for UpdateFunnel {
    fn from(funnel: &Funnel) -> Self {
        Self {
            name: funnel.name.clone(),
            description: funnel.description.clone(),
            elements: funnel.elements.clone(),
        }
    }
}
