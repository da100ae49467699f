use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{Gadget, GadgetChanges, GadgetStatus};
use crate::{error::AppError, state::AppState};

fn parse_status(raw: &str) -> Result<GadgetStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation("Invalid status value! Insert a valid status."))
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Path ids that are not UUIDs cannot name any gadget.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found("Gadget not found"))
}

pub async fn list(
    st: &AppState,
    owner: Uuid,
    status: Option<&str>,
) -> Result<Vec<Gadget>, AppError> {
    let status = blank_to_none(status).map(parse_status).transpose()?;
    let gadgets = st.gadgets.list_by_owner(owner, status).await?;
    if gadgets.is_empty() {
        return Err(match status {
            Some(_) => AppError::not_found("No gadgets found for this status"),
            None => AppError::not_found("No gadgets found"),
        });
    }
    Ok(gadgets)
}

pub async fn create(st: &AppState, owner: Uuid, status: Option<&str>) -> Result<Gadget, AppError> {
    let status = blank_to_none(status)
        .ok_or_else(|| AppError::validation("Status is required"))
        .and_then(parse_status)?;

    let name = crate::names::clean_name(&st.names.generate().await?);
    if name.is_empty() {
        warn!(user_id = %owner, "name generator returned nothing");
        return Err(AppError::Generation("Failed to generate gadget name".into()));
    }

    let gadget = st
        .gadgets
        .create(owner, &name, status)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %owner, "token subject has no user record");
            AppError::unauthorized("Unauthorized")
        })?;
    info!(user_id = %owner, gadget_id = %gadget.id, name = %gadget.name, status = %gadget.status, "gadget created");
    Ok(gadget)
}

pub async fn update(
    st: &AppState,
    id: Uuid,
    owner: Uuid,
    name: Option<&str>,
    status: Option<&str>,
) -> Result<Gadget, AppError> {
    if name.is_none() && status.is_none() {
        return Err(AppError::validation("Name or status is required"));
    }
    let name = match name.map(str::trim) {
        Some("") => return Err(AppError::validation("Name must not be empty")),
        other => other.map(str::to_string),
    };
    let changes = GadgetChanges {
        name,
        status: status.map(parse_status).transpose()?,
    };

    let gadget = st
        .gadgets
        .update_owned(id, owner, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Gadget not found"))?;
    info!(user_id = %owner, gadget_id = %id, status = %gadget.status, "gadget updated");
    Ok(gadget)
}

pub async fn soft_delete(st: &AppState, id: Uuid, owner: Uuid) -> Result<Gadget, AppError> {
    let gadget = st
        .gadgets
        .update_owned(id, owner, GadgetChanges::status(GadgetStatus::Decommissioned))
        .await?
        .ok_or_else(|| AppError::not_found("Gadget not found"))?;
    info!(user_id = %owner, gadget_id = %id, "gadget decommissioned");
    Ok(gadget)
}

pub async fn self_destruct(
    st: &AppState,
    id: Uuid,
    owner: Uuid,
    secret: Option<&str>,
) -> Result<Gadget, AppError> {
    if secret != Some(st.config.self_destruct_secret.as_str()) {
        warn!(user_id = %owner, gadget_id = %id, "self-destruct with wrong secret");
        return Err(AppError::Forbidden(
            "Forbidden! You are not authorised to self destruct this gadget.".into(),
        ));
    }

    let gadget = st
        .gadgets
        .update_owned(id, owner, GadgetChanges::status(GadgetStatus::Destroyed))
        .await?
        .ok_or_else(|| AppError::not_found("Gadget not found"))?;
    info!(user_id = %owner, gadget_id = %id, "gadget self-destructed");
    Ok(gadget)
}
