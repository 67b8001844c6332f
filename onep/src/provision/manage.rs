//! Vendor management calls. Each one is a single request; responses are
//! returned as-is.

use super::client::{segment, Body, KeyHeader, ProvisionClient, ProvisionResponse, DEFAULT_ACCEPT};
use super::{
    ProvisionError, PROVISION_ACTIVATE, PROVISION_DOWNLOAD, PROVISION_MANAGE_CONTENT,
    PROVISION_MANAGE_MODEL, PROVISION_REGISTER,
};
use http::Method;

/// Where a new model's template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    ShareCode(String),
    Rid(String),
}

/// What a model clones from its template. Everything is cloned by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    pub aliases: bool,
    pub comments: bool,
    pub historical: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            aliases: true,
            comments: true,
            historical: true,
        }
    }
}

fn model_path(model: &str) -> String {
    format!("{}{}", PROVISION_MANAGE_MODEL, segment(model))
}

fn model_dir(model: &str) -> String {
    format!("{}{}/", PROVISION_MANAGE_MODEL, segment(model))
}

fn serial_path(model: &str, sn: &str) -> String {
    format!("{}{}/{}", PROVISION_MANAGE_MODEL, segment(model), segment(sn))
}

fn content_dir(model: &str) -> String {
    format!("{}{}/", PROVISION_MANAGE_CONTENT, segment(model))
}

fn content_path(model: &str, content_id: &str) -> String {
    format!(
        "{}{}/{}",
        PROVISION_MANAGE_CONTENT,
        segment(model),
        segment(content_id)
    )
}

impl ProvisionClient {
    async fn manage(
        &self,
        method: Method,
        path: &str,
        key: &str,
        body: Body,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.send(method, path, key, self.key_header(), body, DEFAULT_ACCEPT)
            .await
    }

    pub async fn content_create(
        &self,
        key: &str,
        model: &str,
        content_id: &str,
        meta: &str,
        protect: bool,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let mut form = vec![("id", content_id), ("meta", meta)];
        if protect {
            form.push(("protected", "true"));
        }
        self.manage(Method::POST, &content_dir(model), key, Body::form(&form)?)
            .await
    }

    pub async fn content_download(
        &self,
        cik: &str,
        vendor: &str,
        model: &str,
        content_id: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("vendor", vendor), ("model", model), ("id", content_id)];
        self.send(
            Method::GET,
            PROVISION_DOWNLOAD,
            cik,
            self.key_header(),
            Body::form(&form)?,
            "*",
        )
        .await
    }

    /// Content metadata. With a vendor, asks the download endpoint instead of
    /// the management endpoint.
    pub async fn content_info(
        &self,
        key: &str,
        model: &str,
        content_id: &str,
        vendor: Option<&str>,
    ) -> Result<ProvisionResponse, ProvisionError> {
        match vendor {
            Some(vendor) if !vendor.is_empty() => {
                let form = [("vendor", vendor), ("model", model), ("info", "true")];
                self.manage(Method::GET, PROVISION_DOWNLOAD, key, Body::form(&form)?)
                    .await
            }
            _ => {
                self.manage(Method::GET, &content_path(model, content_id), key, Body::Empty)
                    .await
            }
        }
    }

    pub async fn content_list(
        &self,
        key: &str,
        model: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(Method::GET, &content_dir(model), key, Body::Empty)
            .await
    }

    pub async fn content_remove(
        &self,
        key: &str,
        model: &str,
        content_id: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(Method::DELETE, &content_path(model, content_id), key, Body::Empty)
            .await
    }

    pub async fn content_upload(
        &self,
        key: &str,
        model: &str,
        content_id: &str,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let body = Body::Raw {
            content_type: mime_type.to_string(),
            data,
        };
        self.manage(Method::POST, &content_path(model, content_id), key, body)
            .await
    }

    pub async fn model_create(
        &self,
        key: &str,
        model: &str,
        source: &ModelSource,
        options: ModelOptions,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let mut form = vec![("model", model)];
        match source {
            ModelSource::ShareCode(code) => form.push(("code", code.as_str())),
            ModelSource::Rid(rid) => form.push(("rid", rid.as_str())),
        }
        if !options.aliases {
            form.push(("options[]", "noaliases"));
        }
        if !options.comments {
            form.push(("options[]", "nocomments"));
        }
        if !options.historical {
            form.push(("options[]", "nohistorical"));
        }
        self.manage(Method::POST, PROVISION_MANAGE_MODEL, key, Body::form(&form)?)
            .await
    }

    pub async fn model_info(
        &self,
        key: &str,
        model: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(Method::GET, &model_path(model), key, Body::Empty)
            .await
    }

    pub async fn model_list(&self, key: &str) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(Method::GET, PROVISION_MANAGE_MODEL, key, Body::Empty)
            .await
    }

    pub async fn model_remove(
        &self,
        key: &str,
        model: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("delete", "true"), ("model", model), ("confirm", "true")];
        self.manage(Method::DELETE, &model_path(model), key, Body::form(&form)?)
            .await
    }

    /// Point a model at a new template rid.
    pub async fn model_update(
        &self,
        key: &str,
        model: &str,
        clone_rid: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(
            Method::PUT,
            &model_path(model),
            key,
            Body::form(&[("rid", clone_rid)])?,
        )
        .await
    }

    /// Activate a serial number. Sent without any credential header.
    pub async fn serialnumber_activate(
        &self,
        model: &str,
        serial_number: &str,
        vendor: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("vendor", vendor), ("model", model), ("sn", serial_number)];
        self.manage(Method::POST, PROVISION_ACTIVATE, "", Body::form(&form)?)
            .await
    }

    pub async fn serialnumber_add(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("add", "true"), ("sn", serial_number)];
        self.manage(Method::POST, &model_dir(model), key, Body::form(&form)?)
            .await
    }

    pub async fn serialnumber_add_batch(
        &self,
        key: &str,
        model: &str,
        serial_numbers: &[&str],
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = batch_form("add", serial_numbers);
        self.manage(Method::POST, &model_dir(model), key, Body::form(&form)?)
            .await
    }

    pub async fn serialnumber_disable(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(
            Method::POST,
            &serial_path(model, serial_number),
            key,
            Body::form(&[("disable", "true")])?,
        )
        .await
    }

    pub async fn serialnumber_enable(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
        owner: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("enable", "true"), ("owner", owner)];
        self.manage(
            Method::POST,
            &serial_path(model, serial_number),
            key,
            Body::form(&form)?,
        )
        .await
    }

    pub async fn serialnumber_info(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(Method::GET, &serial_path(model, serial_number), key, Body::Empty)
            .await
    }

    pub async fn serialnumber_list(
        &self,
        key: &str,
        model: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("offset", offset), ("limit", limit)];
        self.manage(Method::GET, &model_dir(model), key, Body::form(&form)?)
            .await
    }

    pub async fn serialnumber_reenable(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(
            Method::POST,
            &serial_path(model, serial_number),
            key,
            Body::form(&[("enable", "true")])?,
        )
        .await
    }

    /// Move an activation from `old_serial_number` to `serial_number`.
    pub async fn serialnumber_remap(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
        old_serial_number: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("enable", "true"), ("oldsn", old_serial_number)];
        self.manage(
            Method::POST,
            &serial_path(model, serial_number),
            key,
            Body::form(&form)?,
        )
        .await
    }

    pub async fn serialnumber_remove(
        &self,
        key: &str,
        model: &str,
        serial_number: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(
            Method::DELETE,
            &serial_path(model, serial_number),
            key,
            Body::Empty,
        )
        .await
    }

    pub async fn serialnumber_remove_batch(
        &self,
        key: &str,
        model: &str,
        serial_numbers: &[&str],
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = batch_form("remove", serial_numbers);
        self.manage(Method::POST, &model_dir(model), key, Body::form(&form)?)
            .await
    }

    pub async fn vendor_register(
        &self,
        key: &str,
        vendor: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        self.manage(
            Method::POST,
            PROVISION_REGISTER,
            key,
            Body::form(&[("vendor", vendor)])?,
        )
        .await
    }

    /// Always authenticates with `X-Exosite-Token`.
    pub async fn vendor_show(&self, token: &str) -> Result<ProvisionResponse, ProvisionError> {
        self.send(
            Method::GET,
            PROVISION_REGISTER,
            token,
            KeyHeader::Token,
            Body::Empty,
            DEFAULT_ACCEPT,
        )
        .await
    }

    /// Always authenticates with `X-Exosite-Token`.
    pub async fn vendor_unregister(
        &self,
        token: &str,
        vendor: &str,
    ) -> Result<ProvisionResponse, ProvisionError> {
        let form = [("delete", "true"), ("vendor", vendor)];
        self.send(
            Method::POST,
            PROVISION_REGISTER,
            token,
            KeyHeader::Token,
            Body::form(&form)?,
            DEFAULT_ACCEPT,
        )
        .await
    }
}

fn batch_form<'a>(action: &'a str, serial_numbers: &[&'a str]) -> Vec<(&'a str, &'a str)> {
    let mut form = Vec::with_capacity(serial_numbers.len() + 1);
    form.push((action, "true"));
    form.extend(serial_numbers.iter().map(|sn| ("sn[]", *sn)));
    form
}
