use crate::{Error, Time};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommunityId(pub i64);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Time,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewCommunity {
    pub name: String,
    pub description: Option<String>,
}

impl NewCommunity {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_name(&self.name)?;
        if let Some(d) = &self.description {
            crate::validate_string(d)?;
        }
        Ok(())
    }
}
