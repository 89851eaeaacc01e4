use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::models::Requisites;
use crate::store::{NewRequisites, RequisitesChanges};

/// Every banking field is required on creation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequisitesRequest {
    /// Accepted for compatibility; requisites always belong to the caller
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 13))]
    pub inn: String,
    #[validate(length(min = 1, max = 50))]
    pub payment: String,
    #[validate(length(min = 1, max = 150))]
    pub bank_name: String,
    #[validate(length(min = 1, max = 11))]
    pub bik: String,
    #[validate(length(min = 1, max = 20))]
    pub city: String,
    #[validate(length(min = 1, max = 22))]
    pub cor_payment: String,
}

impl CreateRequisitesRequest {
    pub fn into_new_requisites(self, user_id: Uuid) -> NewRequisites {
        NewRequisites {
            user_id,
            inn: self.inn,
            payment: self.payment,
            bank_name: self.bank_name,
            bik: self.bik,
            city: self.city,
            cor_payment: self.cor_payment,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRequisitesRequest {
    #[validate(length(max = 13))]
    pub inn: Option<String>,
    #[validate(length(max = 50))]
    pub payment: Option<String>,
    #[validate(length(max = 150))]
    pub bank_name: Option<String>,
    #[validate(length(max = 11))]
    pub bik: Option<String>,
    #[validate(length(max = 20))]
    pub city: Option<String>,
    #[validate(length(max = 22))]
    pub cor_payment: Option<String>,
}

impl From<UpdateRequisitesRequest> for RequisitesChanges {
    fn from(req: UpdateRequisitesRequest) -> Self {
        Self {
            inn: req.inn,
            payment: req.payment,
            bank_name: req.bank_name,
            bik: req.bik,
            city: req.city,
            cor_payment: req.cor_payment,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RequisitesResponse {
    pub user_id: Uuid,
    pub inn: String,
    pub payment: String,
    pub bank_name: String,
    pub bik: String,
    pub city: String,
    pub cor_payment: String,
}

impl From<Requisites> for RequisitesResponse {
    fn from(r: Requisites) -> Self {
        Self {
            user_id: r.user_id,
            inn: r.inn,
            payment: r.payment,
            bank_name: r.bank_name,
            bik: r.bik,
            city: r.city,
            cor_payment: r.cor_payment,
        }
    }
}
