//! Typed backend endpoints.
//!
//! Each method is a thin wrapper over [`ApiClient::execute`]: it picks the
//! path, the auth mode and the fallback error text, then decodes the
//! body. Persisting anything is left to the caller (the session layer).

use gabarita_protocol::{
    ApiResponse, AuthPayload, CreatePaymentRequest, DashboardData, GameQuestionsRequest,
    GenerateQuestionsParams, Group, LoginRequest, News, PaymentData, Plan, Question, RankingEntry,
    SignupRequest, SimulationSubmission, Syllabus, User, UserPatch,
};
use gabarita_transport::{CancelToken, HttpResponse, HttpTransport, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::client::{Auth, Call};
use crate::{ApiClient, ClientError};

const LOGIN_PATH: &str = "/api/auth/login";
const SIGNUP_PATH: &str = "/api/auth/signup";
const PROFILE_PATH: &str = "/api/user/profile";
const GENERATE_QUESTIONS_PATH: &str = "/api/questoes/gerar";
const SUBJECTS_PATH: &str = "/api/questoes/materias";
const SUBMIT_SIMULATION_PATH: &str = "/api/simulados/submit";
const PLANS_PATH: &str = "/api/planos";
const CREATE_PAYMENT_PATH: &str = "/api/pagamentos/criar";
const PAYMENT_STATUS_PATH: &str = "/api/pagamentos/status";
const SYLLABI_PATH: &str = "/api/conteudos-edital";
const GROUPS_PATH: &str = "/api/conteudos-edital/grupos";
const DASHBOARD_PATH: &str = "/api/dashboard";
const RANKING_PATH: &str = "/api/ranking";
const NEWS_PATH: &str = "/api/noticias";
const GAME_QUESTIONS_PATH: &str = "/api/jogos/gerar-questoes";
const GAMES_PATH: &str = "/api/jogos";

/// A list the backend sends either bare or wrapped in an object.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Wrapped {
        #[serde(rename = "questoes", alias = "materias")]
        items: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { items } | Self::Bare(items) => items,
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Exchanges credentials for a user and a token set.
    ///
    /// Sent without a bearer token; a 401 here means bad credentials and
    /// surfaces as [`ClientError::Backend`] with the backend's message.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancelToken,
    ) -> Result<AuthPayload, ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation("email and password are required".into()));
        }
        let body = self.encode(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        let call = Call::new(Method::Post, LOGIN_PATH, "login failed")
            .body(body)
            .auth(Auth::Anonymous);
        let response = self.execute(call, cancel).await?;
        self.auth_payload(&response, "login failed")
    }

    /// Creates an account and signs it in.
    pub async fn signup(
        &self,
        request: &SignupRequest,
        cancel: &CancelToken,
    ) -> Result<AuthPayload, ClientError> {
        let required = [
            ("name", request.name.trim()),
            ("email", request.email.trim()),
            ("cpf", request.cpf.trim()),
            ("password", request.password.as_str()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ClientError::Validation(format!("{field} is required")));
        }
        let call = Call::new(Method::Post, SIGNUP_PATH, "signup failed")
            .body(self.encode(request)?)
            .auth(Auth::Anonymous);
        let response = self.execute(call, cancel).await?;
        self.auth_payload(&response, "signup failed")
    }

    /// Tells the backend the current token is no longer in use.
    ///
    /// Does nothing when no token is stored. Never refreshes: a 401 here
    /// just means the token was already dead.
    pub async fn logout(&self, cancel: &CancelToken) -> Result<(), ClientError> {
        if self.storage().access_token()?.is_none() {
            return Ok(());
        }
        let path = self.config().logout_path.clone();
        let call = Call::new(Method::Post, &path, "logout failed").auth(Auth::BearerOnly);
        self.execute(call, cancel).await?;
        Ok(())
    }

    fn auth_payload(&self, response: &HttpResponse, fallback: &str) -> Result<AuthPayload, ClientError> {
        let envelope: ApiResponse<AuthPayload> = self.decode(response)?;
        let message = envelope.error_message().unwrap_or(fallback).to_string();
        envelope.into_data().ok_or(ClientError::Backend {
            status: response.status,
            message,
        })
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    pub async fn profile(&self, cancel: &CancelToken) -> Result<User, ClientError> {
        self.fetch(Method::Get, PROFILE_PATH, None::<&()>, "could not load profile", cancel)
            .await
    }

    /// Sends a partial profile update and returns the updated user.
    pub async fn update_profile(
        &self,
        patch: &UserPatch,
        cancel: &CancelToken,
    ) -> Result<User, ClientError> {
        if patch.is_empty() {
            return Err(ClientError::Validation("nothing to update".into()));
        }
        self.fetch(Method::Put, PROFILE_PATH, Some(patch), "could not update profile", cancel)
            .await
    }

    // -----------------------------------------------------------------------
    // Questions & mock exams
    // -----------------------------------------------------------------------

    pub async fn generate_questions(
        &self,
        params: &GenerateQuestionsParams,
        cancel: &CancelToken,
    ) -> Result<Vec<Question>, ClientError> {
        if params.count == 0 {
            return Err(ClientError::Validation("count must be at least 1".into()));
        }
        let listing: Listing<Question> = self
            .fetch(
                Method::Post,
                GENERATE_QUESTIONS_PATH,
                Some(params),
                "could not generate questions",
                cancel,
            )
            .await?;
        Ok(listing.into_vec())
    }

    /// Submits a mock exam and returns the backend's result document.
    pub async fn submit_simulation(
        &self,
        submission: &SimulationSubmission,
        cancel: &CancelToken,
    ) -> Result<Value, ClientError> {
        let mut value: Value = self
            .fetch(
                Method::Post,
                SUBMIT_SIMULATION_PATH,
                Some(submission),
                "could not submit mock exam",
                cancel,
            )
            .await?;
        if let Some(result) = value.get_mut("resultado") {
            return Ok(result.take());
        }
        Ok(value)
    }

    /// Subjects covered by a position within an exam block.
    pub async fn subjects_for(
        &self,
        position: &str,
        block: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, ClientError> {
        let path = segment_path(SUBJECTS_PATH, &[position, block])?;
        let listing: Listing<String> = self
            .fetch(Method::Get, &path, None::<&()>, "could not load subjects", cancel)
            .await?;
        Ok(listing.into_vec())
    }

    // -----------------------------------------------------------------------
    // Plans & payments
    // -----------------------------------------------------------------------

    pub async fn plans(&self, cancel: &CancelToken) -> Result<Vec<Plan>, ClientError> {
        self.fetch(Method::Get, PLANS_PATH, None::<&()>, "could not load plans", cancel)
            .await
    }

    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
        cancel: &CancelToken,
    ) -> Result<PaymentData, ClientError> {
        if request.plan_id.trim().is_empty() {
            return Err(ClientError::Validation("plan id is required".into()));
        }
        self.fetch(
            Method::Post,
            CREATE_PAYMENT_PATH,
            Some(request),
            "could not create payment",
            cancel,
        )
        .await
    }

    pub async fn payment_status(
        &self,
        payment_id: &str,
        cancel: &CancelToken,
    ) -> Result<PaymentData, ClientError> {
        let path = segment_path(PAYMENT_STATUS_PATH, &[payment_id])?;
        self.fetch(Method::Get, &path, None::<&()>, "could not check payment status", cancel)
            .await
    }

    // -----------------------------------------------------------------------
    // Syllabus
    // -----------------------------------------------------------------------

    pub async fn syllabi(&self, cancel: &CancelToken) -> Result<Vec<Syllabus>, ClientError> {
        self.fetch(Method::Get, SYLLABI_PATH, None::<&()>, "could not load syllabi", cancel)
            .await
    }

    pub async fn groups_for_position(
        &self,
        position_id: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Group>, ClientError> {
        let path = segment_path(GROUPS_PATH, &[position_id])?;
        self.fetch(Method::Get, &path, None::<&()>, "could not load groups", cancel)
            .await
    }

    // -----------------------------------------------------------------------
    // Dashboard, ranking, news
    // -----------------------------------------------------------------------

    pub async fn dashboard(
        &self,
        syllabus_id: &str,
        cancel: &CancelToken,
    ) -> Result<DashboardData, ClientError> {
        let path = segment_path(DASHBOARD_PATH, &[syllabus_id])?;
        self.fetch(Method::Get, &path, None::<&()>, "could not load dashboard", cancel)
            .await
    }

    pub async fn ranking(
        &self,
        syllabus_id: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<RankingEntry>, ClientError> {
        let path = segment_path(RANKING_PATH, &[syllabus_id])?;
        self.fetch(Method::Get, &path, None::<&()>, "could not load ranking", cancel)
            .await
    }

    pub async fn news(
        &self,
        syllabus_id: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<News>, ClientError> {
        let path = segment_path(NEWS_PATH, &[syllabus_id])?;
        self.fetch(Method::Get, &path, None::<&()>, "could not load news", cancel)
            .await
    }

    // -----------------------------------------------------------------------
    // Games
    // -----------------------------------------------------------------------

    /// Backend-generated content for a game. The shape depends on the game
    /// type, so items are returned as raw JSON.
    pub async fn generate_game_questions(
        &self,
        request: &GameQuestionsRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<Value>, ClientError> {
        self.fetch(
            Method::Post,
            GAME_QUESTIONS_PATH,
            Some(request),
            "could not generate game questions",
            cancel,
        )
        .await
    }

    pub async fn submit_game_result<R: Serialize + ?Sized>(
        &self,
        game_id: &str,
        result: &R,
        cancel: &CancelToken,
    ) -> Result<Value, ClientError> {
        let path = segment_path(GAMES_PATH, &[game_id, "resultado"])?;
        self.fetch(Method::Post, &path, Some(result), "could not submit game result", cancel)
            .await
    }

    async fn fetch<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &str,
        cancel: &CancelToken,
    ) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut call = Call::new(method, path, fallback);
        if let Some(body) = body {
            call = call.body(self.encode(body)?);
        }
        let response = self.execute(call, cancel).await?;
        self.decode(&response)
    }
}

/// Appends percent-encoded segments to an absolute path.
fn segment_path(prefix: &str, segments: &[&str]) -> Result<String, ClientError> {
    if let Some(blank) = segments.iter().position(|s| s.trim().is_empty()) {
        return Err(ClientError::Validation(format!("path segment {blank} is empty")));
    }
    let mut url = Url::parse("http://localhost")
        .map_err(|e| ClientError::Validation(e.to_string()))?;
    url.set_path(prefix);
    url.path_segments_mut()
        .map_err(|()| ClientError::Validation(format!("cannot extend path {prefix}")))?
        .extend(segments);
    Ok(url.path().to_string())
}
