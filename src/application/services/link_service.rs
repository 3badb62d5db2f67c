//! Link registration, editing and resolution service.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::domain::verification::{
    AKA_ENDPOINT, LinkVerifier, LinkVerifyResult, RequestOrigin, TOKEN_ENDPOINT,
};
use crate::error::AppError;
use crate::utils::local_url::is_local_url;
use crate::utils::token::{generate_token, normalize_tags, validate_aka_name};
use serde_json::json;
use tracing::{debug, info};

/// Settings the service reads from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkSettings {
    /// Permit origin URLs that point at this service's own forward endpoints.
    pub allow_self_redirection: bool,
    /// TTL applied to new links that do not specify one.
    pub default_ttl_seconds: Option<u32>,
}

/// Input for registering a new link.
#[derive(Debug, Clone, Default)]
pub struct CreateLinkCommand {
    pub origin_url: String,
    pub aka_name: Option<String>,
    pub note: Option<String>,
    pub is_enabled: bool,
    pub ttl_seconds: Option<u32>,
    pub tags: Vec<String>,
}

/// Result of [`LinkService::create_link`].
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    /// False when an existing link for the same origin URL was returned.
    pub created: bool,
}

/// Service for registering and resolving forwarding links.
///
/// Every origin URL passes through the [`LinkVerifier`] before it is stored,
/// and again before it is followed.
pub struct LinkService<L: LinkRepository, C: ClickRepository> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
    verifier: Arc<LinkVerifier>,
    settings: LinkSettings,
}

impl<L: LinkRepository, C: ClickRepository> LinkService<L, C> {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        click_repository: Arc<C>,
        verifier: Arc<LinkVerifier>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            link_repository,
            click_repository,
            verifier,
            settings,
        }
    }

    pub fn verifier(&self) -> &LinkVerifier {
        &self.verifier
    }

    pub fn settings(&self) -> LinkSettings {
        self.settings
    }

    /// Classifies a candidate origin URL for a request from `origin`.
    ///
    /// Uses the app-local path check from [`is_local_url`] and the configured
    /// self-redirection flag.
    pub fn verify_url(&self, url: Option<&str>, origin: &RequestOrigin) -> LinkVerifyResult {
        let result = self.verifier.verify(
            url,
            &is_local_url,
            origin,
            self.settings.allow_self_redirection,
        );

        metrics::counter!("link_verifications_total", "outcome" => result.code()).increment(1);
        debug!(outcome = %result, origin = %origin, "Verified origin URL");

        result
    }

    /// Verifies a URL, turning any failure into a validation error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with `details.reason` set to the outcome code.
    pub fn ensure_valid_url(&self, url: &str, origin: &RequestOrigin) -> Result<(), AppError> {
        match self.verify_url(Some(url), origin) {
            LinkVerifyResult::Valid => Ok(()),
            failed => Err(AppError::link_verification(failed)),
        }
    }

    /// Registers a new link.
    ///
    /// # Deduplication
    ///
    /// If the origin URL is already registered, the existing link is returned
    /// with `created: false` and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the origin URL fails verification or
    /// the aka name is malformed.
    /// Returns [`AppError::Conflict`] if the aka name is taken.
    pub async fn create_link(
        &self,
        command: CreateLinkCommand,
        origin: &RequestOrigin,
    ) -> Result<CreatedLink, AppError> {
        let origin_url = command.origin_url.trim().to_string();
        self.ensure_valid_url(&origin_url, origin)?;

        if let Some(aka_name) = &command.aka_name {
            validate_aka_name(aka_name)?;
        }

        if let Some(existing) = self
            .link_repository
            .find_by_origin_url(&origin_url)
            .await?
        {
            debug!(id = existing.id, token = %existing.token, "Origin URL already registered");
            return Ok(CreatedLink {
                link: existing,
                created: false,
            });
        }

        if let Some(aka_name) = &command.aka_name {
            self.ensure_aka_name_free(aka_name, None).await?;
        }

        let token = self.generate_unique_token().await?;

        let new_link = NewLink {
            origin_url: origin_url.clone(),
            token,
            aka_name: command.aka_name,
            note: command.note,
            is_enabled: command.is_enabled,
            ttl_seconds: command.ttl_seconds.or(self.settings.default_ttl_seconds),
            tags: normalize_tags(command.tags),
        };

        let link = match self.link_repository.create(new_link).await {
            Ok(link) => link,
            // A concurrent request may have registered the same origin URL
            // between the lookup above and the insert.
            Err(err @ AppError::Conflict { .. }) => {
                return match self.link_repository.find_by_origin_url(&origin_url).await? {
                    Some(existing) => {
                        debug!(
                            id = existing.id,
                            token = %existing.token,
                            "Origin URL registered concurrently"
                        );
                        Ok(CreatedLink {
                            link: existing,
                            created: false,
                        })
                    }
                    None => Err(err),
                };
            }
            Err(err) => return Err(err),
        };
        info!(id = link.id, token = %link.token, "Link created");

        Ok(CreatedLink {
            link,
            created: true,
        })
    }

    /// Applies a partial update to a link.
    ///
    /// A new origin URL is verified exactly like on creation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Validation`] if the new origin URL or aka name is invalid.
    /// Returns [`AppError::Conflict`] if the new aka name is taken.
    pub async fn edit_link(
        &self,
        id: i64,
        mut patch: LinkPatch,
        origin: &RequestOrigin,
    ) -> Result<Link, AppError> {
        self.get_link(id).await?;

        if let Some(origin_url) = patch.origin_url.take() {
            let origin_url = origin_url.trim().to_string();
            self.ensure_valid_url(&origin_url, origin)?;
            patch.origin_url = Some(origin_url);
        }

        if let Some(Some(aka_name)) = &patch.aka_name {
            validate_aka_name(aka_name)?;
            self.ensure_aka_name_free(aka_name, Some(id)).await?;
        }

        patch.tags = patch.tags.map(normalize_tags);

        let link = self.link_repository.update(id, patch).await?;
        info!(id = link.id, "Link updated");

        Ok(link)
    }

    /// Enables or disables a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn set_enabled(&self, id: i64, is_enabled: bool) -> Result<(), AppError> {
        if !self.link_repository.set_enabled(id, is_enabled).await? {
            return Err(link_not_found(id));
        }

        info!(id, is_enabled, "Link state changed");
        Ok(())
    }

    /// Deletes a link and its recorded clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn delete_link(&self, id: i64) -> Result<(), AppError> {
        if !self.link_repository.delete(id).await? {
            return Err(link_not_found(id));
        }

        let clicks = self.click_repository.delete_for_link(id).await?;
        info!(id, clicks, "Link deleted");

        Ok(())
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| link_not_found(id))
    }

    /// Lists links with the total count for the same filter.
    pub async fn list_links(
        &self,
        offset: i64,
        limit: i64,
        term: Option<String>,
    ) -> Result<(Vec<Link>, i64), AppError> {
        tokio::try_join!(
            self.link_repository.list(offset, limit, term.clone()),
            self.link_repository.count(term),
        )
    }

    /// Returns every tag in use with its link count.
    pub async fn list_tags(&self) -> Result<Vec<(String, i64)>, AppError> {
        self.link_repository.tags().await
    }

    /// Resolves an enabled link by forward token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no enabled link has this token.
    pub async fn resolve_token(&self, token: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_token(token)
            .await?
            .filter(|link| link.is_enabled)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "token": token })))
    }

    /// Resolves an enabled link by aka name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no enabled link has this aka name.
    pub async fn resolve_aka(&self, aka_name: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_aka_name(aka_name)
            .await?
            .filter(|link| link.is_enabled)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "aka_name": aka_name })))
    }

    /// Public forward URL for a token, e.g. `https://s.example.com/fw/abc12345`.
    pub fn forward_url(&self, origin: &RequestOrigin, token: &str) -> String {
        format!("{}/{}/{}", origin.base_url(), TOKEN_ENDPOINT, token)
    }

    /// Public forward URL for an aka name.
    pub fn aka_url(&self, origin: &RequestOrigin, aka_name: &str) -> String {
        format!("{}/{}/{}", origin.base_url(), AKA_ENDPOINT, aka_name)
    }

    async fn ensure_aka_name_free(
        &self,
        aka_name: &str,
        owner_id: Option<i64>,
    ) -> Result<(), AppError> {
        match self.link_repository.find_by_aka_name(aka_name).await? {
            Some(existing) if Some(existing.id) != owner_id => Err(AppError::conflict(
                "Aka name already exists",
                json!({ "aka_name": aka_name }),
            )),
            _ => Ok(()),
        }
    }

    /// Generates a token not yet used by any link.
    ///
    /// Attempts up to 10 times before failing.
    async fn generate_unique_token(&self) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let token = generate_token()?;

            if self
                .link_repository
                .find_by_token(&token)
                .await?
                .is_none()
            {
                return Ok(token);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique token",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

fn link_not_found(id: i64) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id }))
}
