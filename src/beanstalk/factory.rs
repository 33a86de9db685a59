use super::{BeanstalkApi, BeanstalkClient, Region};
use crate::aws::build_http_client;
use crate::config::ProxyConfigProvider;
use crate::credentials::AccessKey;
use crate::error::Result;
use std::sync::Arc;

/// Opens a service client for one set of credentials in one region.
pub trait BeanstalkConnector {
    fn connect(&self, access_key: AccessKey, region: Region) -> Result<Arc<dyn BeanstalkApi>>;
}

/// Builds a fresh [`BeanstalkClient`] on every call, with the current proxy settings.
pub struct ClientFactory<'a> {
    proxy: &'a dyn ProxyConfigProvider,
}

impl<'a> ClientFactory<'a> {
    pub fn new(proxy: &'a dyn ProxyConfigProvider) -> Self {
        Self { proxy }
    }
}

impl BeanstalkConnector for ClientFactory<'_> {
    fn connect(&self, access_key: AccessKey, region: Region) -> Result<Arc<dyn BeanstalkApi>> {
        let proxy = self.proxy.proxy();
        let http = build_http_client(proxy.as_ref())?;
        let client = BeanstalkClient::new(http, access_key, region)?;
        Ok(Arc::new(client))
    }
}
