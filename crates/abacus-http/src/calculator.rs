//! Calculator business calls.
//!
//! Thin wrappers that build request descriptors and decode responses. All of
//! them except [`CalculatorApi::operations`] go through
//! [`ApiClient::request`], so they share the credential and refresh handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use abacus_core::error::{Error, InvalidInputError};
use abacus_core::Result;

use crate::client::ApiClient;
use crate::endpoints::*;
use crate::request::ApiRequest;

/// Default page size for [`RecordsQuery`].
const DEFAULT_PAGE_SIZE: u32 = 10;

/// The operations the service can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    SquareRoot,
    RandomString,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Addition,
        OperationKind::Subtraction,
        OperationKind::Multiplication,
        OperationKind::Division,
        OperationKind::SquareRoot,
        OperationKind::RandomString,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Addition => "addition",
            OperationKind::Subtraction => "subtraction",
            OperationKind::Multiplication => "multiplication",
            OperationKind::Division => "division",
            OperationKind::SquareRoot => "square_root",
            OperationKind::RandomString => "random_string",
        }
    }

    /// Number of numeric operands the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            OperationKind::SquareRoot => 1,
            OperationKind::RandomString => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::Operation {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// An operation together with its operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Addition(f64, f64),
    Subtraction(f64, f64),
    Multiplication(f64, f64),
    Division(f64, f64),
    SquareRoot(f64),
    RandomString,
}

impl Operation {
    /// Pair an operation kind with operands, checking the count.
    pub fn new(kind: OperationKind, operands: &[f64]) -> Result<Self> {
        if operands.len() != kind.arity() {
            return Err(InvalidInputError::Other {
                message: format!(
                    "{} takes {} operand(s), got {}",
                    kind,
                    kind.arity(),
                    operands.len()
                ),
            }
            .into());
        }

        Ok(match kind {
            OperationKind::Addition => Operation::Addition(operands[0], operands[1]),
            OperationKind::Subtraction => Operation::Subtraction(operands[0], operands[1]),
            OperationKind::Multiplication => Operation::Multiplication(operands[0], operands[1]),
            OperationKind::Division => Operation::Division(operands[0], operands[1]),
            OperationKind::SquareRoot => Operation::SquareRoot(operands[0]),
            OperationKind::RandomString => Operation::RandomString,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Addition(..) => OperationKind::Addition,
            Operation::Subtraction(..) => OperationKind::Subtraction,
            Operation::Multiplication(..) => OperationKind::Multiplication,
            Operation::Division(..) => OperationKind::Division,
            Operation::SquareRoot(_) => OperationKind::SquareRoot,
            Operation::RandomString => OperationKind::RandomString,
        }
    }

    fn operands(&self) -> (Option<f64>, Option<f64>) {
        match *self {
            Operation::Addition(a, b)
            | Operation::Subtraction(a, b)
            | Operation::Multiplication(a, b)
            | Operation::Division(a, b) => (Some(a), Some(b)),
            Operation::SquareRoot(a) => (Some(a), None),
            Operation::RandomString => (None, None),
        }
    }
}

/// Sort direction for record history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(InvalidInputError::Other {
                message: format!("invalid sort direction '{}'", s),
            }
            .into()),
        }
    }
}

/// Filters and pagination for the record history.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordsQuery {
    pub operation_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub order_by: Option<String>,
    pub order_dir: Option<SortDirection>,
}

impl Default for RecordsQuery {
    fn default() -> Self {
        Self {
            operation_name: None,
            start_date: None,
            end_date: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            order_by: None,
            order_dir: None,
        }
    }
}

impl RecordsQuery {
    fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        let optional = [
            ("operation_name", self.operation_name.as_deref()),
            ("start_date", self.start_date.as_deref()),
            ("end_date", self.end_date.as_deref()),
            ("order_by", self.order_by.as_deref()),
            ("order_dir", self.order_dir.as_ref().map(SortDirection::as_str)),
        ];

        for (key, value) in optional {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                request = request.query(key, value);
            }
        }

        request
            .query("limit", self.limit)
            .query("offset", self.offset)
    }
}

/// One entry in the operation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub id: u64,
    pub operation_name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub user_balance: f64,
    #[serde(default)]
    pub operation_response: String,
    pub date: String,
}

/// A page of operation history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub records: Vec<OperationRecord>,
    #[serde(default)]
    pub total_records: u64,
}

/// An operation offered by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    #[serde(rename = "Type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct OperationsResponse {
    #[serde(default)]
    operations: Vec<OperationInfo>,
}

/// Business calls against the calculator service.
#[derive(Debug, Clone)]
pub struct CalculatorApi {
    client: ApiClient,
}

impl CalculatorApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current credit balance.
    #[instrument(skip(self))]
    pub async fn credits(&self) -> Result<f64> {
        let response: CreditsResponse = self
            .client
            .request_json(ApiRequest::get(USER_CREDITS))
            .await?;
        Ok(response.credits)
    }

    #[instrument(skip(self))]
    pub async fn add_credits(&self, credits: u64) -> Result<()> {
        self.change_credits(credits, "add").await
    }

    /// Fails with a 402 [`abacus_core::error::ApiError`] if the balance is too low.
    #[instrument(skip(self))]
    pub async fn remove_credits(&self, credits: u64) -> Result<()> {
        self.change_credits(credits, "remove").await
    }

    async fn change_credits(&self, credits: u64, action: &str) -> Result<()> {
        let request = ApiRequest::put(USER_CREDITS).json(&CreditsRequest { credits, action })?;
        self.client.request(request).await?;
        debug!(credits, action, "Updated credits");
        Ok(())
    }

    /// Run an operation. The result is a number or a string depending on the
    /// operation, so it is returned as raw JSON.
    #[instrument(skip(self, operation), fields(operation = %operation.kind()))]
    pub async fn perform_operation(&self, operation: Operation) -> Result<serde_json::Value> {
        let (a, b) = operation.operands();
        let request = ApiRequest::post(USER_OPERATION).json(&OperationRequest {
            operation_type: operation.kind().as_str(),
            a,
            b,
        })?;

        let response: OperationResponse = self.client.request_json(request).await?;
        Ok(response.result)
    }

    #[instrument(skip(self))]
    pub async fn records(&self, query: &RecordsQuery) -> Result<RecordsPage> {
        let request = query.apply(ApiRequest::get(RECORDS_HISTORY));
        self.client.request_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, record_id: u64) -> Result<()> {
        let request = ApiRequest::delete(RECORDS_DELETE).query("record_id", record_id);
        self.client.request(request).await?;
        Ok(())
    }

    /// Operations the service offers. Needs no login.
    #[instrument(skip(self))]
    pub async fn operations(&self) -> Result<Vec<OperationInfo>> {
        let response: OperationsResponse = self
            .client
            .send_public(ApiRequest::get(OPERATIONS))
            .await?
            .json()?;
        Ok(response.operations)
    }
}
