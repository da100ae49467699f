use serde::{Deserialize, Serialize};

use super::repo_types::Gadget;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateGadgetRequest {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGadgetRequest {
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelfDestructRequest {
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedGadgetResponse {
    pub message: &'static str,
    pub gadget: Gadget,
}
