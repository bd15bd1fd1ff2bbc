use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    adapters::inbound::http::{
        dto::{ErrorResponseDto, ListingDto, ListingEnvelopeDto},
        router::AppState,
    },
    domain::{
        errors::{ListingError, ValidationError},
        models::{ImageUpload, ListingPayload},
    },
};

/// Multipart part carrying the listing photo
pub const IMAGE_FIELD: &str = "image";

type ErrorResponse = (StatusCode, Json<ErrorResponseDto>);

/// Handle listing all listings
pub async fn list_listings(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ListingDto>>, ErrorResponse> {
    let listings = app_state
        .listing_service
        .list_listings()
        .await
        .map_err(error_response)?;

    Ok(Json(listings.into_iter().map(ListingDto::from).collect()))
}

/// Handle single listing retrieval
pub async fn get_listing(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListingDto>, ErrorResponse> {
    let listing = app_state
        .listing_service
        .get_listing(&id)
        .await
        .map_err(error_response)?;

    Ok(Json(listing.into()))
}

/// Handle listing creation from a multipart form
pub async fn create_listing(
    State(app_state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ListingEnvelopeDto>), ErrorResponse> {
    let multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "Create request was not multipart");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponseDto::bad_request(&rejection.body_text())),
        )
    })?;

    let (payload, image) = read_listing_form(multipart).await?;

    let listing = app_state
        .listing_service
        .create_listing(payload, image)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ListingEnvelopeDto::with_listing(listing)),
    ))
}

/// Handle listing update from a JSON body
pub async fn update_listing(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ListingPayload>, JsonRejection>,
) -> Result<Json<ListingEnvelopeDto>, ErrorResponse> {
    let Json(payload) = payload.map_err(|rejection| {
        error_response(
            ValidationError::MalformedBody {
                reason: rejection.body_text(),
            }
            .into(),
        )
    })?;

    let listing = app_state
        .listing_service
        .update_listing(&id, payload)
        .await
        .map_err(error_response)?;

    Ok(Json(ListingEnvelopeDto::with_listing(listing)))
}

/// Handle listing deletion
pub async fn delete_listing(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListingEnvelopeDto>, ErrorResponse> {
    app_state
        .listing_service
        .delete_listing(&id)
        .await
        .map_err(error_response)?;

    Ok(Json(ListingEnvelopeDto::with_message(
        "Listing deleted successfully",
    )))
}

fn error_response(err: ListingError) -> ErrorResponse {
    let status = StatusCode::from(&err);
    if status.is_server_error() {
        error!(kind = err.kind(), error = %err, "Listing request failed");
    } else {
        debug!(kind = err.kind(), error = %err, "Listing request rejected");
    }

    (status, Json(ErrorResponseDto::from_listing_error(&err)))
}

fn multipart_error(err: MultipartError) -> ErrorResponse {
    let status = err.status();
    warn!(%status, error = %err, "Failed to read multipart body");
    (status, Json(ErrorResponseDto::bad_request(&err.body_text())))
}

/// Collect text parts into a payload and pull out the optional image.
///
/// Repeated keys (typically `features`) become a JSON array. An `image`
/// part with no file name and no bytes is what browsers send for an empty
/// file input, so it counts as no upload.
async fn read_listing_form(
    mut multipart: Multipart,
) -> Result<(ListingPayload, Option<ImageUpload>), ErrorResponse> {
    let mut payload = ListingPayload::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;

            if file_name.is_empty() && data.is_empty() {
                continue;
            }
            if image.is_some() {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponseDto::bad_request(
                        "Only one image may be uploaded per listing",
                    )),
                ));
            }

            image = Some(ImageUpload {
                file_name,
                content_type,
                data,
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            insert_form_value(&mut payload, name, value);
        }
    }

    Ok((payload, image))
}

fn insert_form_value(payload: &mut ListingPayload, name: String, value: String) {
    match payload.get_mut(&name) {
        Some(Value::Array(values)) => values.push(Value::String(value)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
        None => {
            payload.insert(name, Value::String(value));
        }
    }
}
