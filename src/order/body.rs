use secrecy::SecretString;
use serde::Deserialize;
use serde_with::{DisplayFromStr, NoneAsEmptyString, PickFirst, serde_as};

use crate::Result;
use crate::error::Error;
use crate::types::Decimal;

/// JSON body shared by every order endpoint.
///
/// Numeric fields accept JSON numbers or numeric strings. Which fields are
/// required depends on the endpoint, so everything is optional here.
#[serde_as]
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    pub token_id: Option<String>,
    pub price: Option<Decimal>,
    pub side: Option<String>,
    pub size: Option<Decimal>,
    #[serde(alias = "amount")]
    pub amount_usd: Option<Decimal>,
    #[serde_as(as = "PickFirst<(NoneAsEmptyString, _)>")]
    #[serde(default)]
    pub tick_size: Option<Decimal>,
    pub neg_risk: Option<bool>,
    #[serde(alias = "orderType")]
    pub time_in_force: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub expiration: Option<i64>,
    pub signing_key: Option<SecretString>,
    pub funder_address: Option<String>,
}

impl OrderBody {
    /// Decodes a request body. Malformed JSON is a validation error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(bytes)
            .map_err(|e| Error::validation(format!("invalid request body: {e}")))
    }
}
