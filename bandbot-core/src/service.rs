use crate::{
    Config,
    cache::FeedCache,
    error::{Error, FetchError},
    extract::extract,
    feed::HttpFeedSource,
    model::{BandInfo, Response},
    render,
};

/// Cached feed plus the report pipelines built on it.
///
/// Extraction runs on every call; only the fetch is amortized by the cache.
#[derive(Debug)]
pub struct PropagationService {
    cache: FeedCache,
}

impl PropagationService {
    pub fn new(cache: FeedCache) -> Self {
        Self { cache }
    }

    /// HTTP-backed service using the configured URL, timeout and TTL.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let source = HttpFeedSource::from_config(config)?;
        Ok(Self::new(FeedCache::new(Box::new(source), config.cache_ttl())))
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    pub async fn band_info(&self) -> Result<BandInfo, Error> {
        let document = self.cache.get_document().await?;
        Ok(extract(&document)?)
    }

    pub async fn bands_report(&self) -> Result<Response, Error> {
        let info = self.band_info().await?;
        Ok(Response::rich(render::render_text(&info), render::render_html(&info)))
    }

    pub async fn vhf_report(&self) -> Result<Response, Error> {
        let info = self.band_info().await?;
        Ok(Response::rich(render::render_vhf_text(&info), render::render_vhf_html(&info)))
    }

    pub async fn solar_report(&self) -> Result<Response, Error> {
        let info = self.band_info().await?;
        Ok(Response::rich(render::render_solar_text(&info), render::render_solar_html(&info)))
    }
}
