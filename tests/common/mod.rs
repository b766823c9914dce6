#![allow(dead_code)]

// In-process mock of the Planboard REST API plus helpers for building client contexts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use planboard_client::config::AppConfig;
use planboard_client::AppContext;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct-horse";
pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const RENEWED_ACCESS_TOKEN: &str = "access-renewed";
pub const ROTATED_REFRESH_TOKEN: &str = "refresh-rotated";

/// Workspace whose deletion the mock always forbids
pub const LOCKED_WORKSPACE: &str = "locked";
/// Slug the mock reports as already taken
pub const TAKEN_SLUG: &str = "taken";

/// Cookie set by login and the one a refresh rotates it to
pub const SESSION_COOKIE: &str = "sid=session-1";
pub const ROTATED_SESSION_COOKIE: &str = "sid=session-2";

type Reply = Result<Response, Response>;
type Shared = Arc<MockState>;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

pub struct MockState {
    pub valid_token: Mutex<String>,
    pub refresh_token: Mutex<String>,
    pub refresh_enabled: AtomicBool,
    pub refresh_calls: AtomicUsize,
    /// Reject every bearer token, even freshly refreshed ones
    pub reject_all: AtomicBool,
    pub logout_fails: AtomicBool,
    pub unread_count_fails: AtomicBool,
    pub workspace_list_fails: AtomicBool,
    /// Refresh only succeeds when the login session cookie comes along
    pub cookie_required: AtomicBool,
    pub session_cookie: Mutex<String>,
    pub requests: Mutex<Vec<Recorded>>,
    pub workspaces: Mutex<Vec<Value>>,
    pub projects: Mutex<Vec<Value>>,
    pub tasks: Mutex<Vec<Value>>,
    pub members: Mutex<Vec<Value>>,
    pub invitations: Mutex<Vec<Value>>,
    pub labels: Mutex<Vec<Value>>,
    pub notifications: Mutex<Vec<Value>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            valid_token: Mutex::new(ACCESS_TOKEN.to_string()),
            refresh_token: Mutex::new(REFRESH_TOKEN.to_string()),
            refresh_enabled: AtomicBool::new(true),
            refresh_calls: AtomicUsize::new(0),
            reject_all: AtomicBool::new(false),
            logout_fails: AtomicBool::new(false),
            unread_count_fails: AtomicBool::new(false),
            workspace_list_fails: AtomicBool::new(false),
            cookie_required: AtomicBool::new(false),
            session_cookie: Mutex::new(SESSION_COOKIE.to_string()),
            requests: Mutex::new(Vec::new()),
            workspaces: Mutex::new(Vec::new()),
            projects: Mutex::new(Vec::new()),
            tasks: Mutex::new(Vec::new()),
            members: Mutex::new(Vec::new()),
            invitations: Mutex::new(Vec::new()),
            labels: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
        }
    }
}

impl MockState {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let expected = format!("Bearer {}", self.valid_token.lock().as_str());
        let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

        if self.reject_all.load(Ordering::SeqCst) || presented != Some(expected.as_str()) {
            return Err(error(StatusCode::UNAUTHORIZED, "Token expired"));
        }
        Ok(())
    }
}

pub struct Backend {
    pub base_url: String,
    pub state: Shared,
}

impl Backend {
    /// Invalidate the access token the client holds; a refresh yields a working one
    pub fn expire_access_token(&self) {
        *self.state.valid_token.lock() = RENEWED_ACCESS_TOKEN.to_string();
    }

    pub fn disable_refresh(&self) {
        self.state.refresh_enabled.store(false, Ordering::SeqCst);
    }

    pub fn reject_all_tokens(&self) {
        self.state.reject_all.store(true, Ordering::SeqCst);
    }

    pub fn fail_logout(&self) {
        self.state.logout_fails.store(true, Ordering::SeqCst);
    }

    pub fn fail_unread_count(&self, fail: bool) {
        self.state.unread_count_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_workspace_list(&self, fail: bool) {
        self.state.workspace_list_fails.store(fail, Ordering::SeqCst);
    }

    pub fn require_session_cookie(&self) {
        self.state.cookie_required.store(true, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }

    /// Number of recorded calls for a method and path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn seed_workspaces(&self, workspaces: Vec<Value>) {
        *self.state.workspaces.lock() = workspaces;
    }

    pub fn seed_projects(&self, projects: Vec<Value>) {
        *self.state.projects.lock() = projects;
    }

    pub fn seed_tasks(&self, tasks: Vec<Value>) {
        *self.state.tasks.lock() = tasks;
    }

    pub fn seed_members(&self, members: Vec<Value>) {
        *self.state.members.lock() = members;
    }

    pub fn seed_invitations(&self, invitations: Vec<Value>) {
        *self.state.invitations.lock() = invitations;
    }

    pub fn seed_notifications(&self, notifications: Vec<Value>) {
        *self.state.notifications.lock() = notifications;
    }
}

/// Start a mock backend on a free local port
pub async fn spawn_backend() -> Result<Backend> {
    let port = portpicker::pick_unused_port().context("No free port for mock backend")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("Failed to bind mock backend")?;

    let state: Shared = Arc::new(MockState::default());
    let app = Router::new()
        .nest("/api/v1", routes())
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock backend stopped: {}", e);
        }
    });

    Ok(Backend {
        base_url: format!("http://127.0.0.1:{}/api/v1", port),
        state,
    })
}

/// Context with an empty session
pub fn context(backend: &Backend) -> Result<AppContext> {
    Ok(AppContext::in_memory(AppConfig::for_base_url(
        backend.base_url.clone(),
    ))?)
}

/// Context whose session already holds the mock's valid token pair
pub fn signed_in_context(backend: &Backend) -> Result<AppContext> {
    let ctx = context(backend)?;
    ctx.session()
        .store_tokens(ACCESS_TOKEN, Some(REFRESH_TOKEN))?;
    Ok(ctx)
}

/// Poll `condition` until it holds or the timeout elapses
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

// Fixtures

pub fn user_json() -> Value {
    json!({
        "id": "u1",
        "email": EMAIL,
        "firstName": "Ada",
        "lastName": "Lovelace",
        "roles": ["USER"]
    })
}

pub fn workspace_json(id: &str, name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} workspace", name),
        "slug": name.to_lowercase().replace(' ', "-"),
        "logoUrl": null,
        "isActive": true,
        "currentMemberType": role,
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    })
}

pub fn project_json(id: &str, workspace_id: &str, name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "workspaceId": workspace_id,
        "name": name,
        "description": format!("{} project", name),
        "projectKey": name.to_uppercase().replace(' ', "_"),
        "status": "ACTIVE",
        "priority": "MEDIUM",
        "color": "#336699",
        "startDate": "2024-03-01",
        "endDate": "2024-06-30",
        "isPublic": false,
        "currentMemberType": role,
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-01T09:00:00Z"
    })
}

pub fn task_json(id: &str, project_id: &str, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "projectId": project_id,
        "title": title,
        "description": "",
        "status": status,
        "priority": "HIGH",
        "taskKey": format!("PRJ-{}", id),
        "assignees": [],
        "labels": [],
        "createdAt": "2024-03-02T09:00:00Z",
        "updatedAt": "2024-03-02T09:00:00Z"
    })
}

pub fn member_json(id: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "user": {"id": format!("user-{}", id), "email": email},
        "memberType": role,
        "joinedAt": "2024-03-01T09:00:00Z"
    })
}

pub fn invitation_json(id: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "memberType": role,
        "status": "PENDING"
    })
}

pub fn notification_json(id: &str, message: &str, is_read: bool) -> Value {
    json!({
        "id": id,
        "message": message,
        "isRead": is_read,
        "type": "TASK_ASSIGNED",
        "createdAt": "2024-03-02T09:00:00Z"
    })
}

// Routing

fn routes() -> Router<Shared> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/users/me", get(me))
        .route("/workspaces", get(list_workspaces).post(create_workspace))
        .route(
            "/workspaces/:id",
            get(get_workspace).put(update_workspace).delete(delete_workspace),
        )
        .route("/workspaces/:id/restore", patch(restore_workspace))
        .route("/workspaces/:id/members", get(list_members).post(invite_member))
        .route(
            "/workspaces/:id/members/:user_id",
            patch(update_member).delete(remove_member),
        )
        .route("/workspaces/:id/invitations", get(list_invitations))
        .route(
            "/workspaces/:id/invitations/:invitation_id",
            delete(cancel_invitation),
        )
        .route("/workspaces/:id/labels", get(list_labels).post(create_label))
        .route(
            "/workspaces/:id/projects",
            get(list_projects).post(create_project),
        )
        .route(
            "/workspaces/:id/projects/:project_id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/:project_id/tasks", get(list_tasks).post(create_task))
        .route(
            "/projects/:project_id/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread/count", get(unread_count))
        .route("/notifications/mark-all-read", patch(mark_all_read))
        .route("/notifications/clear-all", delete(clear_notifications))
        .route(
            "/notifications/:id",
            get(get_notification).delete(delete_notification),
        )
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    state.requests.lock().push(Recorded {
        method: request.method().to_string(),
        path: path.strip_prefix("/api/v1").unwrap_or(path).to_string(),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        cookie: request
            .headers()
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"status": status.as_u16(), "message": message, "errors": []})),
    )
        .into_response()
}

fn ok(value: Value) -> Reply {
    Ok(Json(value).into_response())
}

fn created(value: Value) -> Reply {
    Ok((StatusCode::CREATED, Json(value)).into_response())
}

fn no_content() -> Reply {
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn not_found(what: &str) -> Response {
    error(StatusCode::NOT_FOUND, &format!("{} not found", what))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn str_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field).and_then(Value::as_str).unwrap_or_default()
}

fn find(items: &[Value], id: &str) -> Option<Value> {
    items.iter().find(|item| item["id"] == id).cloned()
}

/// Overlay the fields of `patch` onto the item with `id`
fn merge(items: &mut [Value], id: &str, patch: &Value) -> Option<Value> {
    let item = items.iter_mut().find(|item| item["id"] == id)?;
    merge_fields(item, patch);
    Some(item.clone())
}

fn remove(items: &mut Vec<Value>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item["id"] != id);
    items.len() != before
}

// Auth

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    if str_field(&body, "email") != EMAIL || str_field(&body, "password") != PASSWORD {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid email or password"));
    }

    *state.valid_token.lock() = ACCESS_TOKEN.to_string();
    *state.refresh_token.lock() = REFRESH_TOKEN.to_string();
    *state.session_cookie.lock() = SESSION_COOKIE.to_string();
    Ok((
        [(SET_COOKIE, format!("{}; Path=/; HttpOnly", SESSION_COOKIE))],
        Json(json!({
            "token": ACCESS_TOKEN,
            "refreshToken": REFRESH_TOKEN,
            "expiresIn": 3600
        })),
    )
        .into_response())
}

fn has_cookie(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|pair| pair.trim() == expected)
}

async fn register(Json(body): Json<Value>) -> Reply {
    if str_field(&body, "email") == EMAIL {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({
                "status": 409,
                "message": "Registration failed",
                "errors": [{"field": "email", "message": "Email already registered"}]
            })),
        )
            .into_response());
    }

    created(json!({
        "user": {"id": new_id(), "email": str_field(&body, "email"), "firstName": str_field(&body, "name")},
        "message": "Registration successful"
    }))
}

async fn logout(State(state): State<Shared>) -> Reply {
    if state.logout_fails.load(Ordering::SeqCst) {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Session store unavailable"));
    }
    no_content()
}

async fn refresh(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    if state.cookie_required.load(Ordering::SeqCst) {
        let mut cookie = state.session_cookie.lock();
        if !has_cookie(&headers, cookie.as_str()) {
            return Err(error(StatusCode::UNAUTHORIZED, "No session cookie"));
        }
        *cookie = ROTATED_SESSION_COOKIE.to_string();
    }

    let mut current = state.refresh_token.lock();
    if !state.refresh_enabled.load(Ordering::SeqCst) || str_field(&body, "refreshToken") != *current {
        return Err(error(StatusCode::UNAUTHORIZED, "Refresh token expired"));
    }

    *current = ROTATED_REFRESH_TOKEN.to_string();
    let access = state.valid_token.lock().clone();
    let cookie = state.session_cookie.lock().clone();
    Ok((
        [(SET_COOKIE, format!("{}; Path=/; HttpOnly", cookie))],
        Json(json!({
            "accessToken": access,
            "refreshToken": ROTATED_REFRESH_TOKEN,
            "tokenType": "Bearer",
            "expiresIn": 3600
        })),
    )
        .into_response())
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    state.authorize(&headers)?;
    ok(user_json())
}

// Workspaces

async fn list_workspaces(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    state.authorize(&headers)?;
    if state.workspace_list_fails.load(Ordering::SeqCst) {
        return Err(error(StatusCode::SERVICE_UNAVAILABLE, "Workspace service unavailable"));
    }
    ok(Value::Array(state.workspaces.lock().clone()))
}

async fn get_workspace(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    let workspace = find(&state.workspaces.lock(), &id).ok_or_else(|| not_found("Workspace"))?;
    ok(workspace)
}

async fn create_workspace(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    if str_field(&body, "slug") == TAKEN_SLUG {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": 400,
                "message": "Validation failed",
                "errors": [{"field": "slug", "message": "Slug already in use"}]
            })),
        )
            .into_response());
    }

    let mut workspace = workspace_json(&new_id(), str_field(&body, "name"), "OWNER");
    workspace["slug"] = body["slug"].clone();
    workspace["description"] = body["description"].clone();
    state.workspaces.lock().push(workspace.clone());
    created(workspace)
}

async fn update_workspace(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let workspace =
        merge(&mut state.workspaces.lock(), &id, &body).ok_or_else(|| not_found("Workspace"))?;
    ok(workspace)
}

async fn delete_workspace(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    if id == LOCKED_WORKSPACE {
        return Err(error(
            StatusCode::FORBIDDEN,
            "Only owners can delete a workspace",
        ));
    }
    if !remove(&mut state.workspaces.lock(), &id) {
        return Err(not_found("Workspace"));
    }
    no_content()
}

async fn restore_workspace(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    let mut workspaces = state.workspaces.lock();
    let restored = match find(&workspaces, &id) {
        Some(existing) => existing,
        None => {
            let workspace = workspace_json(&id, "Restored", "OWNER");
            workspaces.push(workspace.clone());
            workspace
        }
    };
    ok(restored)
}

async fn list_members(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    ok(Value::Array(state.members.lock().clone()))
}

async fn invite_member(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let invitation = invitation_json(
        &new_id(),
        str_field(&body, "email"),
        str_field(&body, "memberType"),
    );
    state.invitations.lock().push(invitation.clone());
    created(invitation)
}

async fn update_member(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_id, member_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let member =
        merge(&mut state.members.lock(), &member_id, &body).ok_or_else(|| not_found("Member"))?;
    ok(member)
}

async fn remove_member(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_id, user_id)): Path<(String, String)>,
) -> Reply {
    state.authorize(&headers)?;
    let mut members = state.members.lock();
    let before = members.len();
    members.retain(|member| member["user"]["id"] != user_id.as_str());
    if members.len() == before {
        return Err(not_found("Member"));
    }
    no_content()
}

async fn list_invitations(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    ok(Value::Array(state.invitations.lock().clone()))
}

async fn cancel_invitation(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_id, invitation_id)): Path<(String, String)>,
) -> Reply {
    state.authorize(&headers)?;
    if !remove(&mut state.invitations.lock(), &invitation_id) {
        return Err(not_found("Invitation"));
    }
    no_content()
}

async fn list_labels(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    ok(Value::Array(state.labels.lock().clone()))
}

async fn create_label(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let label = json!({
        "id": new_id(),
        "name": body["name"],
        "color": body["color"],
        "description": body["description"]
    });
    state.labels.lock().push(label.clone());
    created(label)
}

// Projects

async fn list_projects(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(workspace_id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    let projects = state
        .projects
        .lock()
        .iter()
        .filter(|p| p["workspaceId"] == workspace_id.as_str())
        .cloned()
        .collect();
    ok(Value::Array(projects))
}

async fn get_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_workspace_id, project_id)): Path<(String, String)>,
) -> Reply {
    state.authorize(&headers)?;
    let project = find(&state.projects.lock(), &project_id).ok_or_else(|| not_found("Project"))?;
    ok(project)
}

async fn create_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(workspace_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let mut project = project_json(&new_id(), &workspace_id, str_field(&body, "name"), "OWNER");
    merge_fields(&mut project, &body);
    state.projects.lock().push(project.clone());
    created(project)
}

async fn update_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_workspace_id, project_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let project =
        merge(&mut state.projects.lock(), &project_id, &body).ok_or_else(|| not_found("Project"))?;
    ok(project)
}

async fn delete_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_workspace_id, project_id)): Path<(String, String)>,
) -> Reply {
    state.authorize(&headers)?;
    if !remove(&mut state.projects.lock(), &project_id) {
        return Err(not_found("Project"));
    }
    no_content()
}

// Tasks

async fn list_tasks(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    let tasks = state
        .tasks
        .lock()
        .iter()
        .filter(|t| t["projectId"] == project_id.as_str())
        .cloned()
        .collect();
    ok(Value::Array(tasks))
}

async fn get_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_project_id, task_id)): Path<(String, String)>,
) -> Reply {
    state.authorize(&headers)?;
    let task = find(&state.tasks.lock(), &task_id).ok_or_else(|| not_found("Task"))?;
    ok(task)
}

async fn create_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let mut task = task_json(
        &new_id(),
        &project_id,
        str_field(&body, "title"),
        str_field(&body, "status"),
    );
    merge_fields(&mut task, &body);
    state.tasks.lock().push(task.clone());
    created(task)
}

async fn update_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_project_id, task_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    state.authorize(&headers)?;
    let task = merge(&mut state.tasks.lock(), &task_id, &body).ok_or_else(|| not_found("Task"))?;
    ok(task)
}

async fn delete_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_project_id, task_id)): Path<(String, String)>,
) -> Reply {
    state.authorize(&headers)?;
    if !remove(&mut state.tasks.lock(), &task_id) {
        return Err(not_found("Task"));
    }
    no_content()
}

fn merge_fields(target: &mut Value, fields: &Value) {
    if let (Some(target), Some(fields)) = (target.as_object_mut(), fields.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

// Notifications

async fn list_notifications(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    state.authorize(&headers)?;
    ok(Value::Array(state.notifications.lock().clone()))
}

async fn unread_count(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    state.authorize(&headers)?;
    if state.unread_count_fails.load(Ordering::SeqCst) {
        return Err(error(StatusCode::SERVICE_UNAVAILABLE, "Try again later"));
    }
    let count = state
        .notifications
        .lock()
        .iter()
        .filter(|n| n["isRead"] == false)
        .count();
    ok(json!(count))
}

async fn mark_all_read(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    state.authorize(&headers)?;
    let mut marked = 0;
    for notification in state.notifications.lock().iter_mut() {
        if notification["isRead"] == false {
            notification["isRead"] = json!(true);
            marked += 1;
        }
    }
    ok(json!(marked))
}

async fn clear_notifications(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    state.authorize(&headers)?;
    state.notifications.lock().clear();
    no_content()
}

async fn get_notification(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    let notification =
        find(&state.notifications.lock(), &id).ok_or_else(|| not_found("Notification"))?;
    ok(notification)
}

async fn delete_notification(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    state.authorize(&headers)?;
    if !remove(&mut state.notifications.lock(), &id) {
        return Err(not_found("Notification"));
    }
    no_content()
}
