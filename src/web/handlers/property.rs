//! Property listing handlers.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
        Multipart, Path, Query, State,
    },
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::{authorize, Operation};
use crate::listing::{FilterParams, ListingDraft};
use crate::media::{MediaKind, Upload, UploadPolicy};
use crate::web::dto::ListingResponse;
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::EstateError;

/// Multipart field carrying uploaded media.
pub const FILES_FIELD: &str = "files";

/// GET /api/properties - Search listings.
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<ListingResponse>>, ApiError> {
    authorize(Operation::ReadListings, None).map_err(EstateError::from)?;

    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = params.into_query()?;
    tracing::debug!("Listing search with {} filters", query.filters().len());

    let listings = state.listings.find_all(&query).await?;
    Ok(Json(listings.into_iter().map(ListingResponse::from).collect()))
}

/// GET /api/properties/:id - Fetch one listing.
pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    authorize(Operation::ReadListing, None).map_err(EstateError::from)?;

    let listing = state.listings.find_by_id(&id).await?;
    Ok(Json(listing.into()))
}

/// POST /api/properties - Create a listing (landlords only).
///
/// The role and account checks happen before the multipart body is read.
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ListingResponse>, ApiError> {
    authorize(Operation::CreateListing, Some(&identity)).map_err(EstateError::from)?;

    // The token may outlive its account.
    if state.credentials.find_by_id(&identity.id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let (draft, uploads) = read_submission(multipart, &state.uploads).await?;

    let mut listing = draft.parse()?;
    if !uploads.iter().any(|u| u.kind == MediaKind::Photo) {
        return Err(ApiError::invalid("At least one photo is required"));
    }

    let mut saved = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        let stored = match state.media.save(&upload.content, &upload.file_name).await {
            Ok(stored) => stored,
            Err(e) => {
                state.media.delete_all(&saved).await;
                return Err(e.into());
            }
        };
        match upload.kind {
            MediaKind::Photo => listing.photos.push(stored.public_path.clone()),
            MediaKind::Video => listing.videos.push(stored.public_path.clone()),
        }
        saved.push(stored);
    }

    match state.listings.create(&listing, &identity.id).await {
        Ok(created) => Ok(Json(created.into())),
        Err(e) => {
            tracing::warn!("Listing insert failed, removing {} uploaded files", saved.len());
            state.media.delete_all(&saved).await;
            Err(e.into())
        }
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::debug!("Failed to read multipart body: {}", e);
    ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
}

/// Read the form fields and buffer every file, enforcing upload limits
/// before anything touches the disk.
async fn read_submission(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<(ListingDraft, Vec<Upload>), ApiError> {
    let mut draft = ListingDraft::default();
    let mut uploads: Vec<Upload> = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name != FILES_FIELD {
            let value = field.text().await.map_err(multipart_error)?;
            draft.set(&name, value);
            continue;
        }

        policy.check_count(uploads.len() + 1)?;
        let file_name = field.file_name().unwrap_or_default().to_string();
        let kind = policy.classify(&file_name, field.content_type())?;

        let mut content = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            policy.check_size(&file_name, (content.len() + chunk.len()) as u64)?;
            content.extend_from_slice(&chunk);
        }

        uploads.push(Upload {
            file_name,
            kind,
            content,
        });
    }

    Ok((draft, uploads))
}
