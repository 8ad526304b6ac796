//! # REST gateway client
//!
//! [`ApiClient`] is a thin, stateless wrapper over `reqwest`: it knows the base
//! URL and the bearer token, builds one request per backend operation and maps
//! non-2xx answers to [`ApiError`]. It holds no business logic; pages decide
//! what to fetch and when.
//!
//! Every operation is split in two:
//!
//! - a `*_request` builder that returns the [`reqwest::Request`] (method, URL,
//!   query, body, `Authorization` header) without sending it, and
//! - an async method that builds, sends and decodes.
//!
//! The builders are what the tests exercise; no test touches the network.
//!
//! ## Status mapping
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx | decoded body (or `()` for mutations) |
//! | 401 / 403 | [`ApiError::Unauthorized`] |
//! | other | [`ApiError::Status`] with the body's `message`/`error` field, the raw text, or the reason phrase |

use helpdesk_store::Role;
use reqwest::{Method, Request, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{
    AssignmentRequest, DashboardCounts, ListQuery, LoginRequest, LoginResponse, MasterReportRow,
    NotificationSummary, Page, ReportQuery, Server, ServerForm, ServerReportRow, StaffForm,
    SupportStaff, Ticket, TicketPriority, TicketQuery, TicketStatus,
};

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.token == other.token
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same client with a different bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        let method = request.method().clone();
        let url = request.url().path().to_string();
        self.http.execute(request).await.map_err(|e| {
            tracing::warn!("{method} {url} failed: {e}");
            ApiError::from(e)
        })
    }

    async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        check_status(self.send(request).await?).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn submit(&self, request: Request) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    fn json_request<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<Request, ApiError> {
        Ok(self.builder(method, path).json(body).build()?)
    }

    // ------------------------------------------------------------------
    // Authentication

    pub fn login_request(&self, role: Role, username: &str, password: &str) -> Result<Request, ApiError> {
        let body = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        self.json_request(Method::POST, &format!("/api/auth/{}/login", role.prefix()), &body)
    }

    /// A rejected sign-in is [`ApiError::InvalidCredentials`], never the
    /// session-expiry error the authenticated endpoints raise.
    pub async fn login(&self, role: Role, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self.send(self.login_request(role, username, password)?).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<LoginResponse>().await?);
        }
        let body = response.text().await.unwrap_or_default();
        Err(login_failure(status, &body))
    }

    // ------------------------------------------------------------------
    // Dashboard

    pub fn dashboard_counts_request(&self) -> Result<Request, ApiError> {
        Ok(self.builder(Method::GET, "/api/dashboard/counts").build()?)
    }

    pub async fn dashboard_counts(&self) -> Result<DashboardCounts, ApiError> {
        self.fetch(self.dashboard_counts_request()?).await
    }

    pub fn notifications_request(&self) -> Result<Request, ApiError> {
        Ok(self.builder(Method::GET, "/api/notifications/summary").build()?)
    }

    pub async fn notifications(&self) -> Result<NotificationSummary, ApiError> {
        self.fetch(self.notifications_request()?).await
    }

    // ------------------------------------------------------------------
    // Tickets

    pub fn list_tickets_request(&self, query: &TicketQuery) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::GET, "/api/tickets")
            .query(&query.pairs())
            .build()?)
    }

    pub async fn list_tickets(&self, query: &TicketQuery) -> Result<Page<Ticket>, ApiError> {
        self.fetch(self.list_tickets_request(query)?).await
    }

    pub fn my_tickets_request(&self, query: &TicketQuery) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::GET, "/api/staff/me/tickets")
            .query(&query.pairs())
            .build()?)
    }

    pub async fn my_tickets(&self, query: &TicketQuery) -> Result<Page<Ticket>, ApiError> {
        self.fetch(self.my_tickets_request(query)?).await
    }

    pub fn update_status_request(&self, ticket_id: i64, status: &TicketStatus) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::PUT, &format!("/api/tickets/{ticket_id}/status"))
            .query(&[("status", status.wire_value())])
            .build()?)
    }

    pub async fn update_status(&self, ticket_id: i64, status: &TicketStatus) -> Result<(), ApiError> {
        self.submit(self.update_status_request(ticket_id, status)?).await
    }

    pub fn update_priority_request(&self, ticket_id: i64, priority: &TicketPriority) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::PUT, &format!("/api/tickets/{ticket_id}/priority"))
            .query(&[("priority", priority.wire_value())])
            .build()?)
    }

    pub async fn update_priority(&self, ticket_id: i64, priority: &TicketPriority) -> Result<(), ApiError> {
        self.submit(self.update_priority_request(ticket_id, priority)?).await
    }

    pub fn update_remark_request(&self, ticket_id: i64, remark: &str) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::PUT, &format!("/api/tickets/{ticket_id}/remark"))
            .query(&[("remark", remark.trim())])
            .build()?)
    }

    pub async fn update_remark(&self, ticket_id: i64, remark: &str) -> Result<(), ApiError> {
        self.submit(self.update_remark_request(ticket_id, remark)?).await
    }

    pub fn assign_request(&self, body: &AssignmentRequest) -> Result<Request, ApiError> {
        self.json_request(Method::POST, "/api/tickets/assign", body)
    }

    pub async fn assign_tickets(&self, body: &AssignmentRequest) -> Result<(), ApiError> {
        self.submit(self.assign_request(body)?).await
    }

    // ------------------------------------------------------------------
    // Servers

    pub fn list_servers_request(&self, query: &ListQuery) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::GET, "/api/servers")
            .query(&query.pairs())
            .build()?)
    }

    pub async fn list_servers(&self, query: &ListQuery) -> Result<Page<Server>, ApiError> {
        self.fetch(self.list_servers_request(query)?).await
    }

    pub async fn create_server(&self, form: &ServerForm) -> Result<(), ApiError> {
        self.submit(self.json_request(Method::POST, "/api/servers", form)?).await
    }

    pub fn update_server_request(&self, id: i64, form: &ServerForm) -> Result<Request, ApiError> {
        self.json_request(Method::PUT, &format!("/api/servers/{id}"), form)
    }

    pub async fn update_server(&self, id: i64, form: &ServerForm) -> Result<(), ApiError> {
        self.submit(self.update_server_request(id, form)?).await
    }

    pub fn delete_server_request(&self, id: i64) -> Result<Request, ApiError> {
        Ok(self.builder(Method::DELETE, &format!("/api/servers/{id}")).build()?)
    }

    pub async fn delete_server(&self, id: i64) -> Result<(), ApiError> {
        self.submit(self.delete_server_request(id)?).await
    }

    // ------------------------------------------------------------------
    // Support staff

    pub fn list_staff_request(&self, query: &ListQuery) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::GET, "/api/staff")
            .query(&query.pairs())
            .build()?)
    }

    pub async fn list_staff(&self, query: &ListQuery) -> Result<Page<SupportStaff>, ApiError> {
        self.fetch(self.list_staff_request(query)?).await
    }

    /// Every active staff member, for the assignment picker.
    pub async fn all_staff(&self) -> Result<Vec<SupportStaff>, ApiError> {
        let request = self.builder(Method::GET, "/api/staff/all").build()?;
        self.fetch(request).await
    }

    pub async fn create_staff(&self, form: &StaffForm) -> Result<(), ApiError> {
        self.submit(self.json_request(Method::POST, "/api/staff", form)?).await
    }

    pub async fn update_staff(&self, id: i64, form: &StaffForm) -> Result<(), ApiError> {
        self.submit(self.json_request(Method::PUT, &format!("/api/staff/{id}"), form)?)
            .await
    }

    pub async fn delete_staff(&self, id: i64) -> Result<(), ApiError> {
        let request = self.builder(Method::DELETE, &format!("/api/staff/{id}")).build()?;
        self.submit(request).await
    }

    // ------------------------------------------------------------------
    // Reports

    pub fn master_report_request(&self, query: &ReportQuery) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::GET, "/api/reports/master")
            .query(&query.pairs())
            .build()?)
    }

    pub async fn master_report(&self, query: &ReportQuery) -> Result<Page<MasterReportRow>, ApiError> {
        self.fetch(self.master_report_request(query)?).await
    }

    pub fn server_report_request(&self, query: &ReportQuery) -> Result<Request, ApiError> {
        Ok(self
            .builder(Method::GET, "/api/reports/servers")
            .query(&query.range_pairs())
            .build()?)
    }

    pub async fn server_report(&self, query: &ReportQuery) -> Result<Vec<ServerReportRow>, ApiError> {
        self.fetch(self.server_report_request(query)?).await
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if is_auth_rejection(status) {
        return Err(ApiError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        code: status.as_u16(),
        message: error_message(status, &body),
    })
}

fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Error for a non-2xx answer from the login endpoint.
fn login_failure(status: StatusCode, body: &str) -> ApiError {
    if is_auth_rejection(status) {
        return ApiError::InvalidCredentials(body_message(body).unwrap_or_default());
    }
    ApiError::Status {
        code: status.as_u16(),
        message: error_message(status, body),
    }
}

/// Message carried by an error body, if it has a readable one.
fn body_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "msg"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return Some(text.trim().to_string());
                }
            }
        }
    }
    let text = body.trim();
    if !text.is_empty() && !text.starts_with('<') && !text.starts_with('{') && text.len() <= 200 {
        return Some(text.to_string());
    }
    None
}

/// Best human-readable message from an error body.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    body_message(body).unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn client() -> ApiClient {
        ApiClient::new("http://helpdesk.local/").with_token(Some("tok-1".to_string()))
    }

    fn body_json(request: &Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_requests_carry_bearer_token() {
        let request = client().dashboard_counts_request().unwrap();
        assert_eq!(request.url().as_str(), "http://helpdesk.local/api/dashboard/counts");
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer tok-1"
        );
    }

    #[test]
    fn test_anonymous_client_sends_no_token() {
        let request = ApiClient::new("http://helpdesk.local")
            .login_request(Role::Staff, " emp7 ", "pw")
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/api/auth/staff/login");
        assert_eq!(
            body_json(&request),
            serde_json::json!({"username": "emp7", "password": "pw"})
        );
    }

    #[test]
    fn test_ticket_list_query() {
        let query = TicketQuery {
            page: 0,
            size: 10,
            search: "printer jam".to_string(),
            status: Some(TicketStatus::InProgress),
            priority: Some(TicketPriority::High),
        };
        let request = client().list_tickets_request(&query).unwrap();
        assert_eq!(
            request.url().query(),
            Some("page=0&size=10&searchTerm=printer+jam&status=IN_PROGRESS&priority=HIGH")
        );
    }

    #[test]
    fn test_status_priority_remark_updates_use_query_parameters() {
        let c = client();

        let status = c.update_status_request(42, &TicketStatus::Resolved).unwrap();
        assert_eq!(status.method(), &Method::PUT);
        assert_eq!(status.url().path(), "/api/tickets/42/status");
        assert_eq!(status.url().query(), Some("status=RESOLVED"));

        let priority = c.update_priority_request(42, &TicketPriority::Urgent).unwrap();
        assert_eq!(priority.url().query(), Some("priority=URGENT"));

        let remark = c.update_remark_request(42, " called back & fixed ").unwrap();
        assert_eq!(remark.url().query(), Some("remark=called+back+%26+fixed"));
    }

    #[test]
    fn test_assign_body() {
        let body = AssignmentRequest {
            staff_ids: vec![3, 1],
            ticket_ids: vec![42],
        };
        let request = client().assign_request(&body).unwrap();
        assert_eq!(request.url().path(), "/api/tickets/assign");
        assert_eq!(
            body_json(&request),
            serde_json::json!({"staffIds": [3, 1], "ticketIds": [42]})
        );
    }

    #[test]
    fn test_server_crud_paths() {
        let c = client();
        let form = ServerForm {
            name: "Alpha".into(),
            code: "ALPHA".into(),
            base_url: String::new(),
            active: true,
        };
        let update = c.update_server_request(5, &form).unwrap();
        assert_eq!(update.method(), &Method::PUT);
        assert_eq!(update.url().path(), "/api/servers/5");
        assert_eq!(body_json(&update)["baseUrl"], "");

        let delete = c.delete_server_request(5).unwrap();
        assert_eq!(delete.method(), &Method::DELETE);

        let list = c.list_staff_request(&ListQuery::default()).unwrap();
        assert_eq!(list.url().query(), Some("page=0&size=10"));
    }

    #[test]
    fn test_report_requests() {
        let query = ReportQuery {
            from: chrono::NaiveDate::from_ymd_opt(2024, 2, 1),
            to: chrono::NaiveDate::from_ymd_opt(2024, 2, 29),
            staff_id: Some(9),
            page: 0,
            size: 10,
        };
        let c = client();
        let master = c.master_report_request(&query).unwrap();
        assert_eq!(
            master.url().query(),
            Some("from=2024-02-01&to=2024-02-29&staffId=9&page=0&size=10")
        );
        let servers = c.server_report_request(&query).unwrap();
        assert_eq!(servers.url().query(), Some("from=2024-02-01&to=2024-02-29"));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"message": "Duplicate code"}"#),
            "Duplicate code"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, "Ticket already closed"),
            "Ticket already closed"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_rejected_login_is_not_session_expiry() {
        let err = login_failure(StatusCode::UNAUTHORIZED, r#"{"message":"Invalid credentials"}"#);
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid credentials");
        assert_ne!(err.user_message(), ApiError::Unauthorized.user_message());

        let bare = login_failure(StatusCode::FORBIDDEN, "");
        assert_eq!(bare.user_message(), "Invalid username or password.");

        let html = login_failure(StatusCode::UNAUTHORIZED, "<html>denied</html>");
        assert_eq!(html.user_message(), "Invalid username or password.");
    }

    #[test]
    fn test_login_server_error_keeps_status() {
        let err = login_failure(StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"Maintenance"}"#);
        assert!(matches!(err, ApiError::Status { code: 503, .. }));
        assert_eq!(err.user_message(), "Maintenance");
    }
}
