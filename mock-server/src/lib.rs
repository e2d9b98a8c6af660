//! In-memory mock of the Transifex v2 REST API.
//!
//! Covers projects, resources (JSON and multipart uploads), languages and
//! language teams. Creations answer `201 Created` as plain text like the
//! real service; deletions answer `204`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, RawQuery, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub source_language_code: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub homepage: String,
    #[serde(skip)]
    pub resources: BTreeMap<String, Resource>,
    #[serde(skip)]
    pub languages: BTreeMap<String, Language>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Resource {
    pub slug: String,
    pub name: String,
    pub i18n_type: String,
    pub category: Option<String>,
    pub priority: u8,
    pub accept_translations: bool,
    #[serde(skip)]
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Language {
    pub coordinators: Vec<String>,
    #[serde(default)]
    pub translators: Vec<String>,
    #[serde(default)]
    pub reviewers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub source_language_code: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub private: Option<bool>,
    pub homepage: Option<String>,
    pub source_language_code: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateLanguage {
    pub language_code: String,
    #[serde(flatten)]
    pub teams: Language,
}

pub type Db = Arc<RwLock<HashMap<String, Project>>>;

type Failure = (StatusCode, String);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/2/projects/", get(list_projects).post(create_project))
        .route("/api/2/project/{slug}", delete(delete_project))
        .route(
            "/api/2/project/{slug}/",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/2/project/{slug}/resources", get(list_resources))
        .route(
            "/api/2/project/{slug}/resources/",
            get(list_resources).post(create_resource),
        )
        .route(
            "/api/2/project/{slug}/resource/{resource}",
            delete(delete_resource),
        )
        .route(
            "/api/2/project/{slug}/resource/{resource}/",
            get(get_resource).delete(delete_resource),
        )
        .route(
            "/api/2/project/{slug}/resource/{resource}/content/",
            get(get_content).put(update_content),
        )
        .route(
            "/api/2/project/{slug}/languages/",
            get(list_languages).post(create_language),
        )
        .route(
            "/api/2/project/{slug}/language/{code}/",
            get(get_language).put(update_language).delete(delete_language),
        )
        .route(
            "/api/2/project/{slug}/language/{code}/{role}/",
            get(get_team).put(update_team),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- helpers ---

fn not_found(what: &str) -> Failure {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

fn bad_request(msg: impl Into<String>) -> Failure {
    (StatusCode::BAD_REQUEST, msg.into())
}

fn created() -> Response {
    (StatusCode::CREATED, "Created").into_response()
}

fn has_flag(query: &RawQuery, flag: &str) -> bool {
    query
        .0
        .as_deref()
        .is_some_and(|q| q.split('&').any(|part| part == flag || part.starts_with(&format!("{flag}="))))
}

fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn valid_username(user: &str) -> bool {
    !user.is_empty()
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Drop or reject invalid usernames depending on `skip_invalid`.
fn check_users(users: Vec<String>, skip_invalid: bool) -> Result<Vec<String>, Failure> {
    let (valid, invalid): (Vec<String>, Vec<String>) =
        users.into_iter().partition(|user| valid_username(user));
    if !invalid.is_empty() && !skip_invalid {
        return Err(bad_request(format!(
            "Invalid usernames: {}",
            invalid.join(", ")
        )));
    }
    Ok(valid)
}

fn project_summary(project: &Project) -> Value {
    json!(project)
}

/// Fields and content of a resource upload, from either JSON or multipart.
#[derive(Default)]
struct Upload {
    fields: HashMap<String, String>,
    content: Option<String>,
}

async fn read_upload(request: Request) -> Result<Upload, Failure> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let mut upload = Upload::default();
    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| bad_request(e.body_text()))?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let value = field.text().await.map_err(|e| bad_request(e.body_text()))?;
            if name == "content" {
                upload.content = Some(value);
            } else {
                upload.fields.insert(name, value);
            }
        }
    } else {
        let Json(body) = Json::<Value>::from_request(request, &())
            .await
            .map_err(|e| (e.status(), e.body_text()))?;
        let Value::Object(map) = body else {
            return Err(bad_request("expected a JSON object"));
        };
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Null => continue,
                other => other.to_string(),
            };
            if key == "content" {
                upload.content = Some(text);
            } else {
                upload.fields.insert(key, text);
            }
        }
    }
    Ok(upload)
}

fn content_stats(old: &str, new: &str) -> Value {
    let old_lines: Vec<&str> = old.lines().filter(|l| !l.trim().is_empty()).collect();
    let new_lines: Vec<&str> = new.lines().filter(|l| !l.trim().is_empty()).collect();
    let added = new_lines.iter().filter(|l| !old_lines.contains(l)).count();
    let deleted = old_lines.iter().filter(|l| !new_lines.contains(l)).count();
    json!({ "strings_added": added, "strings_updated": 0, "strings_delete": deleted })
}

// --- projects ---

async fn list_projects(State(db): State<Db>) -> Json<Vec<Value>> {
    let projects = db.read().await;
    let mut list: Vec<&Project> = projects.values().collect();
    list.sort_by(|a, b| a.slug.cmp(&b.slug));
    Json(list.into_iter().map(project_summary).collect())
}

async fn create_project(
    State(db): State<Db>,
    Json(input): Json<CreateProject>,
) -> Result<Response, Failure> {
    if !valid_slug(&input.slug) {
        return Err(bad_request("Invalid slug"));
    }
    let mut projects = db.write().await;
    if projects.contains_key(&input.slug) {
        return Err(bad_request("Project with this Slug already exists."));
    }
    info!(slug = %input.slug, "project created");
    projects.insert(
        input.slug.clone(),
        Project {
            slug: input.slug,
            name: input.name,
            description: input.description,
            source_language_code: input.source_language_code,
            long_description: String::new(),
            private: false,
            homepage: String::new(),
            resources: BTreeMap::new(),
            languages: BTreeMap::new(),
        },
    );
    Ok(created())
}

async fn get_project(
    State(db): State<Db>,
    Path(slug): Path<String>,
    query: RawQuery,
) -> Result<Json<Value>, Failure> {
    let projects = db.read().await;
    let project = projects.get(&slug).ok_or_else(|| not_found("project"))?;
    let mut body = project_summary(project);
    if has_flag(&query, "details") {
        body["resources"] = project
            .resources
            .values()
            .map(|r| json!({ "slug": r.slug, "name": r.name }))
            .collect();
        body["teams"] = project.languages.keys().cloned().collect();
    }
    Ok(Json(body))
}

async fn update_project(
    State(db): State<Db>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateProject>,
) -> Result<Json<Value>, Failure> {
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    if let Some(name) = input.name {
        project.name = name;
    }
    if let Some(description) = input.description {
        project.description = description;
    }
    if let Some(long_description) = input.long_description {
        project.long_description = long_description;
    }
    if let Some(private) = input.private {
        project.private = private;
    }
    if let Some(homepage) = input.homepage {
        project.homepage = homepage;
    }
    if let Some(code) = input.source_language_code {
        project.source_language_code = code;
    }
    Ok(Json(project_summary(project)))
}

async fn delete_project(
    State(db): State<Db>,
    Path(slug): Path<String>,
) -> Result<StatusCode, Failure> {
    db.write()
        .await
        .remove(&slug)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("project"))
}

// --- resources ---

async fn list_resources(
    State(db): State<Db>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Resource>>, Failure> {
    let projects = db.read().await;
    let project = projects.get(&slug).ok_or_else(|| not_found("project"))?;
    Ok(Json(project.resources.values().cloned().collect()))
}

async fn create_resource(
    State(db): State<Db>,
    Path(slug): Path<String>,
    request: Request,
) -> Result<Response, Failure> {
    let mut upload = read_upload(request).await?;
    let field = |upload: &mut Upload, key: &str| upload.fields.remove(key);

    let resource_slug = field(&mut upload, "slug").ok_or_else(|| bad_request("slug is required"))?;
    if !valid_slug(&resource_slug) {
        return Err(bad_request("Invalid slug"));
    }
    let name = field(&mut upload, "name").ok_or_else(|| bad_request("name is required"))?;
    let i18n_type =
        field(&mut upload, "i18n_type").ok_or_else(|| bad_request("i18n_type is required"))?;
    let content = upload
        .content
        .take()
        .ok_or_else(|| bad_request("content is required"))?;
    let priority = match field(&mut upload, "priority") {
        Some(p) => p.parse().map_err(|_| bad_request("Invalid priority"))?,
        None => 0,
    };
    let accept_translations = field(&mut upload, "accept_translations")
        .map(|v| v == "true")
        .unwrap_or(true);
    let category = field(&mut upload, "category");

    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    if project.resources.contains_key(&resource_slug) {
        return Err(bad_request("Resource with this Slug already exists."));
    }
    info!(project = %slug, resource = %resource_slug, "resource created");
    project.resources.insert(
        resource_slug.clone(),
        Resource {
            slug: resource_slug,
            name,
            i18n_type,
            category,
            priority,
            accept_translations,
            content,
        },
    );
    Ok(created())
}

async fn get_resource(
    State(db): State<Db>,
    Path((slug, resource)): Path<(String, String)>,
    query: RawQuery,
) -> Result<Json<Value>, Failure> {
    let projects = db.read().await;
    let project = projects.get(&slug).ok_or_else(|| not_found("project"))?;
    let resource = project
        .resources
        .get(&resource)
        .ok_or_else(|| not_found("resource"))?;
    let mut body = json!(resource);
    if has_flag(&query, "details") {
        body["total_entities"] = json!(resource.content.lines().filter(|l| !l.trim().is_empty()).count());
        body["available_languages"] = project.languages.keys().cloned().collect();
    }
    Ok(Json(body))
}

async fn get_content(
    State(db): State<Db>,
    Path((slug, resource)): Path<(String, String)>,
) -> Result<Json<Value>, Failure> {
    let projects = db.read().await;
    let project = projects.get(&slug).ok_or_else(|| not_found("project"))?;
    let resource = project
        .resources
        .get(&resource)
        .ok_or_else(|| not_found("resource"))?;
    Ok(Json(json!({ "content": resource.content, "mimetype": "text/plain" })))
}

async fn update_content(
    State(db): State<Db>,
    Path((slug, resource)): Path<(String, String)>,
    request: Request,
) -> Result<Json<Value>, Failure> {
    let upload = read_upload(request).await?;
    let content = upload
        .content
        .ok_or_else(|| bad_request("content is required"))?;
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    let resource = project
        .resources
        .get_mut(&resource)
        .ok_or_else(|| not_found("resource"))?;
    let stats = content_stats(&resource.content, &content);
    resource.content = content;
    Ok(Json(stats))
}

async fn delete_resource(
    State(db): State<Db>,
    Path((slug, resource)): Path<(String, String)>,
) -> Result<StatusCode, Failure> {
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    project
        .resources
        .remove(&resource)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("resource"))
}

// --- languages ---

async fn list_languages(
    State(db): State<Db>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Value>>, Failure> {
    let projects = db.read().await;
    let project = projects.get(&slug).ok_or_else(|| not_found("project"))?;
    Ok(Json(
        project
            .languages
            .iter()
            .map(|(code, language)| {
                let mut body = json!(language);
                body["language_code"] = json!(code);
                body
            })
            .collect(),
    ))
}

async fn create_language(
    State(db): State<Db>,
    Path(slug): Path<String>,
    query: RawQuery,
    Json(input): Json<CreateLanguage>,
) -> Result<Response, Failure> {
    let skip_invalid = has_flag(&query, "skip_invalid_username");
    let language = checked_language(input.teams, skip_invalid)?;
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    if project.languages.contains_key(&input.language_code) {
        return Err(bad_request("A team for this language already exists."));
    }
    info!(project = %slug, language = %input.language_code, "language created");
    project.languages.insert(input.language_code, language);
    Ok(created())
}

fn checked_language(language: Language, skip_invalid: bool) -> Result<Language, Failure> {
    let coordinators = check_users(language.coordinators, skip_invalid)?;
    if coordinators.is_empty() {
        return Err(bad_request("You must specify at least one coordinator."));
    }
    Ok(Language {
        coordinators,
        translators: check_users(language.translators, skip_invalid)?,
        reviewers: check_users(language.reviewers, skip_invalid)?,
        list: language.list,
    })
}

async fn get_language(
    State(db): State<Db>,
    Path((slug, code)): Path<(String, String)>,
    query: RawQuery,
) -> Result<Json<Value>, Failure> {
    let projects = db.read().await;
    let project = projects.get(&slug).ok_or_else(|| not_found("project"))?;
    let language = project
        .languages
        .get(&code)
        .ok_or_else(|| not_found("language"))?;
    let mut body = json!(language);
    if has_flag(&query, "details") {
        body["language_code"] = json!(code);
        body["total_segments"] = json!(project
            .resources
            .values()
            .map(|r| r.content.lines().filter(|l| !l.trim().is_empty()).count())
            .sum::<usize>());
        body["translated_segments"] = json!(0);
    }
    Ok(Json(body))
}

async fn update_language(
    State(db): State<Db>,
    Path((slug, code)): Path<(String, String)>,
    Json(input): Json<Language>,
) -> Result<Json<Value>, Failure> {
    let language = checked_language(input, false)?;
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    let slot = project
        .languages
        .get_mut(&code)
        .ok_or_else(|| not_found("language"))?;
    *slot = language;
    Ok(Json(json!(slot)))
}

async fn delete_language(
    State(db): State<Db>,
    Path((slug, code)): Path<(String, String)>,
) -> Result<StatusCode, Failure> {
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    project
        .languages
        .remove(&code)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("language"))
}

fn team_mut<'a>(language: &'a mut Language, role: &str) -> Option<&'a mut Vec<String>> {
    match role {
        "coordinators" => Some(&mut language.coordinators),
        "reviewers" => Some(&mut language.reviewers),
        "translators" => Some(&mut language.translators),
        _ => None,
    }
}

async fn get_team(
    State(db): State<Db>,
    Path((slug, code, role)): Path<(String, String, String)>,
) -> Result<Json<Value>, Failure> {
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    let language = project
        .languages
        .get_mut(&code)
        .ok_or_else(|| not_found("language"))?;
    let team = team_mut(language, &role).ok_or_else(|| not_found("team"))?;
    Ok(Json(json!({ role: team })))
}

async fn update_team(
    State(db): State<Db>,
    Path((slug, code, role)): Path<(String, String, String)>,
    query: RawQuery,
    Json(users): Json<Vec<String>>,
) -> Result<Json<Value>, Failure> {
    let users = check_users(users, has_flag(&query, "skip_invalid_username"))?;
    if role == "coordinators" && users.is_empty() {
        return Err(bad_request("You must specify at least one coordinator."));
    }
    let mut projects = db.write().await;
    let project = projects.get_mut(&slug).ok_or_else(|| not_found("project"))?;
    let language = project
        .languages
        .get_mut(&code)
        .ok_or_else(|| not_found("language"))?;
    let team = team_mut(language, &role).ok_or_else(|| not_found("team"))?;
    *team = users;
    Ok(Json(json!({ role: team })))
}
