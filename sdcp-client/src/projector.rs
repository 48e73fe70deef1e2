//! High-level projector API.
//!
//! [`Projector`] turns items and data codes into typed settings. Each call
//! opens the connection when needed and closes it again afterwards, unless
//! the caller already holds a session open through [`Projector::connector`].

use crate::config::Capabilities;
use crate::connector::Connector;
use crate::error::ClientError;
use bytes::Bytes;
use sdcp_protocol::value::{decode_u16, encode_u16, QUERY_DATA};
use sdcp_protocol::model::Choice;
use sdcp_protocol::{CommandKind, Item, Model, PowerStatus, Switch};

/// A projector reached through a [`Connector`].
pub struct Projector {
    connector: Connector,
    capabilities: Capabilities,
}

impl Projector {
    pub fn new(connector: Connector, capabilities: Capabilities) -> Self {
        Self {
            connector,
            capabilities,
        }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The configured model, when it is in the model table.
    pub fn model(&self) -> Option<Model> {
        self.capabilities.model()
    }

    /// Named values of `item` on the configured model.
    pub fn choices(&self, item: &Item) -> &'static [Choice] {
        match self.model() {
            Some(model) => model.choices(item),
            None => &[],
        }
    }

    /// Reads the raw data of `item`.
    pub async fn get_setting(&self, item: &Item) -> Result<Bytes, ClientError> {
        self.ensure_supported(item)?;
        tracing::debug!("Get setting {}", item);
        self.connector
            .execute(item, CommandKind::Get, &QUERY_DATA)
            .await
    }

    /// Writes raw data to `item`.
    pub async fn set_setting(&self, item: &Item, data: &[u8]) -> Result<Bytes, ClientError> {
        self.ensure_supported(item)?;
        tracing::debug!("Set setting {} to {}", item, hex::encode_upper(data));
        self.connector.execute(item, CommandKind::Set, data).await
    }

    pub async fn power_status(&self) -> Result<PowerStatus, ClientError> {
        let data = self.get_setting(&Item::STATUS_POWER).await?;
        PowerStatus::from_data_code(&data).ok_or_else(|| ClientError::InvalidValue {
            item: Item::STATUS_POWER,
            data: data.to_vec(),
        })
    }

    /// Switches the projector on. Only allowed from standby, or when the
    /// power status is unknown: undecodable, or refused by the device.
    ///
    /// Over IR the code is sent a second time when the status was unknown,
    /// since a projector in deep standby may drop the first one.
    pub async fn power_on(&self) -> Result<(), ClientError> {
        let unknown = match self.power_status().await {
            Ok(PowerStatus::Standby) => false,
            Ok(status) => {
                return Err(ClientError::NotReady {
                    command: "power on",
                    status: status.to_string(),
                })
            }
            Err(ClientError::InvalidValue { data, .. }) => {
                tracing::debug!(
                    "Unknown power status {}, powering on anyway",
                    hex::encode_upper(&data)
                );
                true
            }
            Err(e) if e.is_device_error() => {
                tracing::debug!("Power status refused ({}), powering on anyway", e);
                true
            }
            Err(e) => return Err(e),
        };

        if self.capabilities.power_command {
            self.set_setting(&Item::POWER, &Switch::On.data_code())
                .await?;
        } else {
            self.connector.send_ir(&Item::IR_POWER_ON).await?;
            if unknown {
                self.connector.send_ir(&Item::IR_POWER_ON).await?;
            }
        }
        Ok(())
    }

    /// Switches the projector off. Only allowed while it is on.
    pub async fn power_off(&self) -> Result<(), ClientError> {
        let status = self.power_status().await?;
        if status != PowerStatus::PowerOn {
            return Err(ClientError::NotReady {
                command: "power off",
                status: status.to_string(),
            });
        }

        if self.capabilities.power_command {
            self.set_setting(&Item::POWER, &Switch::Off.data_code())
                .await?;
        } else {
            self.connector.send_ir(&Item::IR_POWER_OFF).await?;
        }
        Ok(())
    }

    pub async fn contrast(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::CONTRAST).await
    }

    pub async fn set_contrast(&self, value: u16) -> Result<(), ClientError> {
        self.set_u16(&Item::CONTRAST, value).await
    }

    pub async fn brightness(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::BRIGHTNESS).await
    }

    pub async fn set_brightness(&self, value: u16) -> Result<(), ClientError> {
        self.set_u16(&Item::BRIGHTNESS, value).await
    }

    pub async fn color(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::COLOR).await
    }

    pub async fn set_color(&self, value: u16) -> Result<(), ClientError> {
        self.set_u16(&Item::COLOR, value).await
    }

    pub async fn hue(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::HUE).await
    }

    pub async fn set_hue(&self, value: u16) -> Result<(), ClientError> {
        self.set_u16(&Item::HUE, value).await
    }

    pub async fn sharpness(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::SHARPNESS).await
    }

    pub async fn set_sharpness(&self, value: u16) -> Result<(), ClientError> {
        self.set_u16(&Item::SHARPNESS, value).await
    }

    pub async fn iris_manual(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::IRIS_MANUAL).await
    }

    pub async fn set_iris_manual(&self, value: u16) -> Result<(), ClientError> {
        self.set_u16(&Item::IRIS_MANUAL, value).await
    }

    /// Lamp hours.
    pub async fn lamp_use_time(&self) -> Result<u16, ClientError> {
        self.get_u16(&Item::LAMP_USE_TIME).await
    }

    pub async fn picture_muting(&self) -> Result<Switch, ClientError> {
        self.get_switch(&Item::PICTURE_MUTING).await
    }

    pub async fn set_picture_muting(&self, value: Switch) -> Result<(), ClientError> {
        self.set_code(&Item::PICTURE_MUTING, value.data_code()).await
    }

    pub async fn overscan(&self) -> Result<Switch, ClientError> {
        self.get_switch(&Item::OVERSCAN).await
    }

    pub async fn set_overscan(&self, value: Switch) -> Result<(), ClientError> {
        self.set_code(&Item::OVERSCAN, value.data_code()).await
    }

    pub async fn xvcolor(&self) -> Result<Switch, ClientError> {
        self.get_switch(&Item::XVCOLOR).await
    }

    pub async fn set_xvcolor(&self, value: Switch) -> Result<(), ClientError> {
        self.set_code(&Item::XVCOLOR, value.data_code()).await
    }

    pub async fn input(&self) -> Result<Option<&'static str>, ClientError> {
        self.get_choice(&Item::INPUT).await
    }

    pub async fn set_input(&self, name: &str) -> Result<(), ClientError> {
        self.set_choice(&Item::INPUT, name).await
    }

    pub async fn aspect(&self) -> Result<Option<&'static str>, ClientError> {
        self.get_choice(&Item::ASPECT).await
    }

    pub async fn set_aspect(&self, name: &str) -> Result<(), ClientError> {
        self.set_choice(&Item::ASPECT, name).await
    }

    pub async fn calibration_preset(&self) -> Result<Option<&'static str>, ClientError> {
        self.get_choice(&Item::CALIBRATION_PRESET).await
    }

    pub async fn set_calibration_preset(&self, name: &str) -> Result<(), ClientError> {
        self.set_choice(&Item::CALIBRATION_PRESET, name).await
    }

    /// Reads an enumerated setting and names its value. `None` when the
    /// model is not configured or has no name for the code.
    pub async fn get_choice(&self, item: &Item) -> Result<Option<&'static str>, ClientError> {
        let code = self.get_code(item).await?;
        Ok(self.model().and_then(|model| model.name_for(item, &code)))
    }

    /// Writes an enumerated setting by the name of its value.
    pub async fn set_choice(&self, item: &Item, name: &str) -> Result<(), ClientError> {
        self.ensure_supported(item)?;
        let code = self
            .model()
            .and_then(|model| model.code_for(item, name))
            .ok_or_else(|| ClientError::UnknownChoice {
                item: *item,
                name: name.to_string(),
            })?;
        self.set_code(item, code).await
    }

    /// Reads the 2-byte data code of an enumerated setting such as input,
    /// aspect or gamma correction.
    pub async fn get_code(&self, item: &Item) -> Result<[u8; 2], ClientError> {
        let data = self.get_setting(item).await?;
        match data.as_ref() {
            [hi, lo, ..] => Ok([*hi, *lo]),
            _ => Err(ClientError::InvalidValue {
                item: *item,
                data: data.to_vec(),
            }),
        }
    }

    pub async fn set_code(&self, item: &Item, code: [u8; 2]) -> Result<(), ClientError> {
        self.set_setting(item, &code).await?;
        Ok(())
    }

    async fn get_u16(&self, item: &Item) -> Result<u16, ClientError> {
        let data = self.get_setting(item).await?;
        decode_u16(&data).ok_or_else(|| ClientError::InvalidValue {
            item: *item,
            data: data.to_vec(),
        })
    }

    async fn set_u16(&self, item: &Item, value: u16) -> Result<(), ClientError> {
        self.set_code(item, encode_u16(value)).await
    }

    async fn get_switch(&self, item: &Item) -> Result<Switch, ClientError> {
        let code = self.get_code(item).await?;
        Ok(Switch::from_data_code(&code))
    }

    fn ensure_supported(&self, item: &Item) -> Result<(), ClientError> {
        if self.capabilities.supports(item) {
            Ok(())
        } else {
            Err(ClientError::Unavailable(*item))
        }
    }
}
