//! Core protocol types for the backend's JSON documents.
//!
//! Every type here is a plain data carrier: no behaviour beyond small
//! constructors and accessors. Field names are English on the Rust side;
//! `#[serde(rename = ...)]` maps them to the backend's wire names.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The backend's response envelope, also used as the client's tagged
/// result shape: `{ success, data?, message?, error? }`.
///
/// Endpoints that follow the envelope contract (auth) send
/// `success: true` together with `data`; on failure they send
/// `success: false` and a human-readable `error` or `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// The payload, present on success. A missing key decodes as `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Informational message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// A failed envelope carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// The most specific failure text: `error`, then `message`.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }

    /// Returns the payload when the envelope is a success with data.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// Turns any `Result` into the tagged envelope, so callers that prefer the
/// `{ success, error }` shape can have it without matching.
impl<T, E: fmt::Display> From<Result<T, E>> for ApiResponse<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A platform user, as returned by the auth and profile endpoints and as
/// persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// The public-service position the user is preparing for.
    #[serde(rename = "cargo", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// The exam block the position belongs to.
    #[serde(rename = "bloco", default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Plan tier (`trial`, `free`, `premium`, ...).
    #[serde(rename = "plano")]
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(rename = "questionsAnswered", default, skip_serializing_if = "Option::is_none")]
    pub questions_answered: Option<u64>,
    #[serde(rename = "conteudoEditalId", default, skip_serializing_if = "Option::is_none")]
    pub syllabus_id: Option<String>,
    #[serde(rename = "cargoId", default, skip_serializing_if = "Option::is_none")]
    pub position_id: Option<String>,
    #[serde(rename = "grupoId", default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// A partial profile update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "cargo", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "bloco", default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(rename = "plano", default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl UserPatch {
    /// `true` when no field is set; sending it would be a no-op.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/auth/signup`: login credentials plus the
/// classification the backend needs to pick the user's syllabus.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub cpf: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    #[serde(rename = "conteudoEditalId")]
    pub syllabus_id: String,
    #[serde(rename = "cargoId")]
    pub position_id: String,
    #[serde(rename = "grupoId")]
    pub group_id: String,
    #[serde(rename = "plano", default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("syllabus_id", &self.syllabus_id)
            .field("position_id", &self.position_id)
            .field("group_id", &self.group_id)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

/// `data` of a successful login/signup envelope.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    /// Short-lived access token.
    pub token: String,
    /// Longer-lived refresh token. Some deployments omit it.
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPayload")
            .field("user", &self.user.id)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/auth/refresh-token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

impl fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshRequest { .. }")
    }
}

/// `data` of a successful refresh envelope.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPayload {
    pub token: String,
}

impl fmt::Debug for RefreshPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshPayload { .. }")
    }
}

// ---------------------------------------------------------------------------
// Questions & mock exams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A multiple-choice question generated by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub source: String,
}

/// Body of `POST /api/questoes/gerar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuestionsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub difficulty: Difficulty,
    pub count: u32,
    #[serde(rename = "bloco", default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(rename = "cargo", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// One answered question inside a [`SimulationSubmission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationAnswer {
    #[serde(rename = "questao_id")]
    pub question_id: String,
    /// The chosen option as a letter (`A`, `B`, ...).
    #[serde(rename = "resposta_usuario")]
    pub answer: String,
    /// Answer key, filled in by the backend when absent.
    #[serde(rename = "gabarito", default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<String>,
    #[serde(rename = "tempo_resposta")]
    pub response_time_secs: u32,
}

/// Body of `POST /api/simulados/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSubmission {
    #[serde(rename = "usuario_id")]
    pub user_id: String,
    #[serde(rename = "respostas")]
    pub answers: Vec<SimulationAnswer>,
}

impl SimulationSubmission {
    /// Per-answer time reported when the caller did not measure it.
    pub const DEFAULT_RESPONSE_TIME_SECS: u32 = 30;

    /// Builds a submission from option indices paired with question ids.
    ///
    /// Index 0 becomes `A`, 1 becomes `B`, and so on. Extra entries on
    /// either side are ignored.
    pub fn from_choices(
        user_id: impl Into<String>,
        question_ids: &[String],
        choices: &[usize],
    ) -> Self {
        let answers = question_ids
            .iter()
            .zip(choices)
            .map(|(id, choice)| SimulationAnswer {
                question_id: id.clone(),
                answer: option_letter(*choice),
                answer_key: None,
                response_time_secs: Self::DEFAULT_RESPONSE_TIME_SECS,
            })
            .collect();
        Self {
            user_id: user_id.into(),
            answers,
        }
    }
}

fn option_letter(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map(|b| char::from(b).to_string())
        .unwrap_or_else(|| index.to_string())
}

/// Body of `POST /api/jogos/gerar-questoes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameQuestionsRequest {
    pub game_type: String,
    #[serde(rename = "conteudoEditalId")]
    pub syllabus_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

// ---------------------------------------------------------------------------
// Syllabus (exam notice contents)
// ---------------------------------------------------------------------------

/// One exam notice's content tree: positions → groups → subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllabus {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "ativo", default)]
    pub active: bool,
    #[serde(rename = "cargos", default)]
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "grupos", default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "materias", default)]
    pub subjects: Vec<String>,
}

// ---------------------------------------------------------------------------
// Plans & payments
// ---------------------------------------------------------------------------

/// A subscription plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "periodo")]
    pub period: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "recursos", default)]
    pub features: Vec<String>,
    #[serde(rename = "limitacoes", default)]
    pub limitations: Vec<String>,
    #[serde(rename = "ativo", default)]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Payment record returned by the payment endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    #[serde(rename = "planoId")]
    pub plan_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "metodo")]
    pub method: String,
    pub status: PaymentStatus,
    #[serde(rename = "mercadoPagoId", default, skip_serializing_if = "Option::is_none")]
    pub provider_payment_id: Option<String>,
    #[serde(rename = "preferenceId", default, skip_serializing_if = "Option::is_none")]
    pub preference_id: Option<String>,
    #[serde(rename = "paymentUrl", default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

/// Body of `POST /api/pagamentos/criar`: the plan plus provider-specific
/// fields, flattened into the same object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(rename = "planId")]
    pub plan_id: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Dashboard, ranking, news
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPerformance {
    #[serde(rename = "semana")]
    pub week: String,
    #[serde(rename = "questoes")]
    pub questions: u32,
    #[serde(rename = "acertos")]
    pub correct: u32,
    #[serde(rename = "percentual")]
    pub accuracy_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(rename = "totalQuestoes", default)]
    pub total_questions: u32,
    #[serde(rename = "acertos", default)]
    pub correct: u32,
    #[serde(rename = "erros", default)]
    pub wrong: u32,
    #[serde(rename = "percentualAcerto", default)]
    pub accuracy_pct: f64,
    #[serde(rename = "tempoMedioResposta", default)]
    pub avg_answer_secs: f64,
    #[serde(default)]
    pub ranking: u32,
    #[serde(rename = "totalUsuarios", default)]
    pub total_users: u32,
    #[serde(rename = "performanceWeekly", default)]
    pub weekly: Vec<WeeklyPerformance>,
    #[serde(rename = "materiasEstudadas", default)]
    pub subjects_studied: Vec<String>,
    #[serde(rename = "proximasProvas", default)]
    pub upcoming_exams: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub position: u32,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub questions_answered: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: String,
    pub published_at: String,
    #[serde(default)]
    pub category: String,
}
