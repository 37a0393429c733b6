use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use sea_orm::*;
use tracing::instrument;

use crate::entity::content::asset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::asset::{AssetListQuery, AssetListResponse, AssetResponse, AssetSummary};
use crate::models::shared::{Pagination, StatusMessage};
use crate::state::AppState;
use crate::store;
use crate::utils::filename::validate_flat_filename;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(512 * 1024 * 1024) // 512 MB
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Files",
    operation_id = "listAssets",
    summary = "List assets with pagination",
    description = "Returns assets ordered by filename ascending, paginated by zero-based `page` \
        and `count` page size. Blob content is never included. When the requested page holds no \
        items the response is a 200 with a \"No Data Available\" message instead of an empty list. \
        Requires `asset:view` permission.",
    params(AssetListQuery),
    responses(
        (status = 200, description = "Paginated asset list, or a no-data message", body = AssetListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_assets(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AssetListQuery>,
) -> Result<Response, AppError> {
    tracing::info!(user = %auth_user.username, "asset list requested");
    auth_user.require_permission("asset:view")?;

    let page = query.page.unwrap_or(0);
    let count = query.count.unwrap_or(20).clamp(1, 100);

    let select = asset::Entity::find();

    let total = select.clone().paginate(&state.db, count).num_items().await?;
    let total_pages = total.div_ceil(count);

    let data = select
        .order_by_asc(asset::Column::FileName)
        .select_only()
        .column(asset::Column::Id)
        .column(asset::Column::TypeId)
        .column(asset::Column::Description)
        .column(asset::Column::MediaType)
        .column(asset::Column::FileName)
        .offset(Some(page * count))
        .limit(Some(count))
        .into_model::<AssetSummary>()
        .all(&state.db)
        .await?;

    if data.is_empty() {
        return Ok(Json(StatusMessage {
            message: "No Data Available",
        })
        .into_response());
    }

    Ok(Json(AssetListResponse {
        data,
        pagination: Pagination {
            page,
            count,
            total,
            total_pages,
        },
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/{value}",
    tag = "Files",
    operation_id = "downloadAsset",
    summary = "Download an asset's content",
    description = "Resolves `value` as a numeric id first, falling back to a filename match, and \
        returns the raw bytes with the stored media type. Requires `asset:view` permission.",
    params(("value" = String, Path, description = "Asset id or filename")),
    responses(
        (status = 200, description = "Asset content"),
        (status = 400, description = "File not found (NOT_FOUND)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(value))]
pub async fn get_asset(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Response, AppError> {
    tracing::info!(user = %auth_user.username, %value, "asset download requested");
    auth_user.require_permission("asset:view")?;

    let model = find_asset(&state.db, &value).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &model.media_type)
        .header(header::CONTENT_LENGTH, model.content.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&model.file_name),
        )
        .body(Body::from(model.content))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/{value}/detail",
    tag = "Files",
    operation_id = "assetDetail",
    summary = "Get an asset's metadata",
    description = "Same id-or-filename resolution as the download endpoint, returning the full \
        metadata record without the blob. Requires `asset:view` permission.",
    params(("value" = String, Path, description = "Asset id or filename")),
    responses(
        (status = 200, description = "Asset metadata", body = AssetResponse),
        (status = 400, description = "File not found (NOT_FOUND)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(value))]
pub async fn asset_detail(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<AssetResponse>, AppError> {
    tracing::info!(user = %auth_user.username, %value, "asset detail requested");
    auth_user.require_permission("asset:view")?;

    let model = find_asset(&state.db, &value).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Files",
    operation_id = "addAsset",
    summary = "Upload a new asset",
    description = "Multipart upload with fields `typeId`, `description`, `content` (the file), \
        and optional `mediaType` and `fileName` overrides. The filename defaults to the upload's \
        own name, the media type to the upload's declared content type. A filename already in use \
        yields a 200 response with a DUPLICATE_FILENAME error payload and no new record. Requires \
        `asset:create` permission.",
    request_body(content_type = "multipart/form-data", description = "Asset upload form"),
    responses(
        (status = 200, description = "Created record (content omitted), or a duplicate-name error payload", body = AssetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn add_asset(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    auth_user.refresh_access(&state.db).await?;
    auth_user.require_permission("asset:create")?;

    let mut form = read_asset_form(multipart).await?;
    let type_id = form.require_type_id()?;
    let upload = form
        .upload
        .take()
        .ok_or_else(|| AppError::Validation("Missing 'content' field".into()))?;

    let file_name = resolve_file_name(form.file_name.as_deref(), &upload)?;
    let media_type = resolve_media_type(form.media_type.as_deref(), &upload, &file_name);

    if store::name_taken(&state.db, &file_name).await? {
        return Ok(duplicate_name_response(&file_name));
    }

    let now = chrono::Utc::now();
    let new_asset = asset::ActiveModel {
        type_id: Set(type_id),
        description: Set(form.description),
        file_name: Set(file_name.clone()),
        media_type: Set(media_type),
        content: Set(upload.bytes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // A concurrent upload can slip past the existence check; the unique
    // constraint reports it as the same soft error.
    let model = match new_asset.insert(&state.db).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Ok(duplicate_name_response(&file_name));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(AssetResponse::from(model)).into_response())
}

#[utoipa::path(
    put,
    path = "/{value}",
    tag = "Files",
    operation_id = "updateAsset",
    summary = "Replace an existing asset",
    description = "Resolves the target by id or filename and replaces all fields and content \
        unconditionally. Filename uniqueness is re-checked only when the resolved filename \
        differs from the target's current one; a collision yields the 200 duplicate-name payload \
        with the record unchanged. Requires `asset:edit` permission.",
    params(("value" = String, Path, description = "Asset id or filename")),
    request_body(content_type = "multipart/form-data", description = "Asset upload form"),
    responses(
        (status = 200, description = "Updated record (content omitted), or a duplicate-name error payload", body = AssetResponse),
        (status = 400, description = "File not found (NOT_FOUND) or validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(value))]
pub async fn update_asset(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(value): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    auth_user.refresh_access(&state.db).await?;
    auth_user.require_permission("asset:edit")?;

    let existing = find_asset(&state.db, &value).await?;

    let mut form = read_asset_form(multipart).await?;
    let type_id = form.require_type_id()?;
    let upload = form
        .upload
        .take()
        .ok_or_else(|| AppError::Validation("Missing 'content' field".into()))?;

    let file_name = resolve_file_name(form.file_name.as_deref(), &upload)?;
    let media_type = resolve_media_type(form.media_type.as_deref(), &upload, &file_name);

    if file_name != existing.file_name && store::name_taken(&state.db, &file_name).await? {
        return Ok(duplicate_name_response(&file_name));
    }

    let mut active: asset::ActiveModel = existing.into();
    active.type_id = Set(type_id);
    active.description = Set(form.description);
    active.file_name = Set(file_name.clone());
    active.media_type = Set(media_type);
    active.content = Set(upload.bytes);
    active.updated_at = Set(chrono::Utc::now());

    let model = match active.update(&state.db).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Ok(duplicate_name_response(&file_name));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(AssetResponse::from(model)).into_response())
}

#[utoipa::path(
    delete,
    path = "/{value}",
    tag = "Files",
    operation_id = "removeAsset",
    summary = "Delete an asset",
    description = "Resolves the target by id or filename and deletes the record. Dependent \
        entities are not cascaded. Requires `asset:delete` permission.",
    params(("value" = String, Path, description = "Asset id or filename")),
    responses(
        (status = 200, description = "Delete confirmation message", body = StatusMessage),
        (status = 400, description = "File not found (NOT_FOUND)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(value))]
pub async fn remove_asset(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<StatusMessage>, AppError> {
    auth_user.refresh_access(&state.db).await?;
    auth_user.require_permission("asset:delete")?;

    let model = find_asset(&state.db, &value).await?;

    asset::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;

    Ok(Json(StatusMessage {
        message: "Delete Successful",
    }))
}

/// Collected multipart form fields for add/update.
#[derive(Default)]
struct AssetForm {
    type_id: Option<String>,
    description: Option<String>,
    media_type: Option<String>,
    file_name: Option<String>,
    upload: Option<UploadPart>,
}

/// The `content` part of the form, buffered whole.
struct UploadPart {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl AssetForm {
    fn require_type_id(&self) -> Result<i32, AppError> {
        let raw = self
            .type_id
            .as_deref()
            .ok_or_else(|| AppError::Validation("Missing 'typeId' field".into()))?;
        raw.trim()
            .parse::<i32>()
            .map_err(|_| AppError::Validation("typeId must be an integer".into()))
    }
}

async fn read_asset_form(mut multipart: Multipart) -> Result<AssetForm, AppError> {
    let mut form = AssetForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("content") => {
                // Some clients declare a per-part length; a negative one is
                // malformed input, rejected before any bytes are read.
                if let Some(len) = field
                    .headers()
                    .get(header::CONTENT_LENGTH)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<i64>().ok())
                    && len < 0
                {
                    return Err(AppError::Validation("File length is invalid".into()));
                }

                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                form.upload = Some(UploadPart {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("typeId") => form.type_id = Some(read_text_field(field, "typeId").await?),
            Some("description") => {
                form.description = Some(read_text_field(field, "description").await?);
            }
            Some("mediaType") => form.media_type = Some(read_text_field(field, "mediaType").await?),
            Some("fileName") => form.file_name = Some(read_text_field(field, "fileName").await?),
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(form)
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))
}

/// The explicit `fileName` field wins; otherwise the upload's own name.
fn resolve_file_name(explicit: Option<&str>, upload: &UploadPart) -> Result<String, AppError> {
    let candidate = match explicit {
        Some(name) if !name.trim().is_empty() => name,
        _ => upload
            .file_name
            .as_deref()
            .ok_or_else(|| AppError::Validation("Missing 'fileName' field and the upload carries no filename".into()))?,
    };

    Ok(validate_flat_filename(candidate)
        .map_err(|e| AppError::Validation(e.message().into()))?
        .to_string())
}

/// The explicit `mediaType` field wins, then the part's declared content
/// type, then a guess from the filename extension.
fn resolve_media_type(explicit: Option<&str>, upload: &UploadPart, file_name: &str) -> String {
    if let Some(media_type) = explicit
        && !media_type.trim().is_empty()
    {
        return media_type.trim().to_string();
    }
    if let Some(content_type) = upload.content_type.as_deref() {
        return content_type.to_string();
    }
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

async fn find_asset<C: ConnectionTrait>(db: &C, value: &str) -> Result<asset::Model, AppError> {
    store::find_by_id_or_name(db, value)
        .await?
        .ok_or_else(|| AppError::NotFound("File Not Found".into()))
}

/// Duplicate filenames are a business-rule failure reported with a success
/// status, matching the contract legacy clients were written against.
fn duplicate_name_response(file_name: &str) -> Response {
    (
        StatusCode::OK,
        Json(ErrorBody {
            code: "DUPLICATE_FILENAME",
            message: format!("File Name '{file_name}' already exists"),
        }),
    )
        .into_response()
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("inline; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
