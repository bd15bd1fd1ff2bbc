use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::{ListingError, ListingResult},
        models::{ImageUpload, Listing, ListingPayload, NewListing},
        rules::{resolve_image_ref, ImageNamer, ListingSchema},
        value_objects::{ImageRef, ListingId},
    },
    ports::{repositories::ListingRepository, services::ListingService, storage::ImageStore},
};

/// Directory (relative to the public root) that uploaded images go into
pub const DEFAULT_IMAGE_ROOT: &str = "images";

/// Implementation of ListingService over a repository and an image store
#[derive(Clone)]
pub struct ListingServiceImpl {
    repository: Arc<dyn ListingRepository>,
    images: Arc<dyn ImageStore>,
    namer: Arc<ImageNamer>,
    image_root: String,
    schema: Option<ListingSchema>,
}

impl ListingServiceImpl {
    /// Create a new ListingServiceImpl instance
    pub fn new(repository: Arc<dyn ListingRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self {
            repository,
            images,
            namer: Arc::new(ImageNamer::system()),
            image_root: DEFAULT_IMAGE_ROOT.to_string(),
            schema: None,
        }
    }

    /// Schema in force for this call; the year bound moves with the calendar
    fn schema(&self) -> ListingSchema {
        self.schema.unwrap_or_else(ListingSchema::new)
    }

    fn resolve_image(&self, image: Option<&ImageUpload>) -> ImageRef {
        match image {
            Some(upload) => resolve_image_ref(
                &self.image_root,
                Some(&upload.file_name),
                self.namer.next_token(),
            ),
            None => ImageRef::default_image(),
        }
    }

    // Malformed ids on update/delete cannot name a stored listing
    fn existing_id(&self, raw: &str) -> ListingResult<ListingId> {
        self.repository
            .parse_id(raw)
            .ok_or_else(|| ListingError::NotFound {
                id: raw.to_string(),
            })
    }
}

#[async_trait]
impl ListingService for ListingServiceImpl {
    async fn create_listing(
        &self,
        payload: ListingPayload,
        image: Option<ImageUpload>,
    ) -> ListingResult<Listing> {
        let details = self.schema().validate_new(&payload).map_err(|e| {
            debug!(error = %e, "Rejected listing submission");
            e
        })?;

        let image_ref = self.resolve_image(image.as_ref());

        if let Some(upload) = image {
            debug!(
                image = %image_ref,
                size = upload.data.len(),
                content_type = upload.content_type.as_deref().unwrap_or("unknown"),
                "Storing listing image"
            );
            self.images.put_image(&image_ref, upload.data).await?;
        }

        let listing = self
            .repository
            .create(NewListing {
                image_ref: image_ref.clone(),
                details,
            })
            .await
            .map_err(|e| {
                if !image_ref.is_default() {
                    warn!(image = %image_ref, error = %e, "Listing not stored; image left orphaned");
                }
                e
            })?;

        info!(id = %listing.id, image = %listing.image_ref, "Created listing");
        Ok(listing)
    }

    async fn list_listings(&self) -> ListingResult<Vec<Listing>> {
        self.repository.get_all().await
    }

    async fn get_listing(&self, id: &str) -> ListingResult<Listing> {
        let listing_id = self
            .repository
            .parse_id(id)
            .ok_or_else(|| ListingError::InvalidId { id: id.to_string() })?;

        self.repository
            .get_by_id(&listing_id)
            .await?
            .ok_or_else(|| ListingError::not_found(&listing_id))
    }

    async fn update_listing(&self, id: &str, payload: ListingPayload) -> ListingResult<Listing> {
        let patch = self.schema().validate_patch(&payload).map_err(|e| {
            debug!(id, error = %e, "Rejected listing update");
            e
        })?;

        let listing_id = self.existing_id(id)?;

        let listing = self
            .repository
            .update(&listing_id, &patch)
            .await?
            .ok_or_else(|| ListingError::not_found(&listing_id))?;

        info!(id = %listing.id, "Updated listing");
        Ok(listing)
    }

    async fn delete_listing(&self, id: &str) -> ListingResult<()> {
        let listing_id = self.existing_id(id)?;

        if !self.repository.delete(&listing_id).await? {
            return Err(ListingError::not_found(&listing_id));
        }

        info!(id = %listing_id, "Deleted listing");
        Ok(())
    }
}

/// Builder for ListingServiceImpl
pub struct ListingServiceBuilder {
    repository: Option<Arc<dyn ListingRepository>>,
    images: Option<Arc<dyn ImageStore>>,
    namer: Option<Arc<ImageNamer>>,
    image_root: String,
    schema: Option<ListingSchema>,
}

impl ListingServiceBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            images: None,
            namer: None,
            image_root: DEFAULT_IMAGE_ROOT.to_string(),
            schema: None,
        }
    }

    pub fn repository(mut self, repository: Arc<dyn ListingRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn images(mut self, images: Arc<dyn ImageStore>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn namer(mut self, namer: Arc<ImageNamer>) -> Self {
        self.namer = Some(namer);
        self
    }

    pub fn image_root(mut self, image_root: impl Into<String>) -> Self {
        self.image_root = image_root.into();
        self
    }

    /// Pin the schema (and its year bound) instead of tracking the calendar
    pub fn schema(mut self, schema: ListingSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn build(self) -> Result<ListingServiceImpl, &'static str> {
        let repository = self.repository.ok_or("Repository is required")?;
        let images = self.images.ok_or("Image store is required")?;

        Ok(ListingServiceImpl {
            repository,
            images,
            namer: self
                .namer
                .unwrap_or_else(|| Arc::new(ImageNamer::system())),
            image_root: self.image_root,
            schema: self.schema,
        })
    }
}

impl Default for ListingServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
