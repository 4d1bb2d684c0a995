//! Base-map tile providers

use crate::Error;
use std::str::FromStr;

const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

/// A raster tile source for the base map
#[derive(Debug, Clone, PartialEq)]
pub struct TileProvider {
    /// Label shown in the layer control
    pub name: String,
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileProvider {
    pub fn open_street_map() -> Self {
        Self {
            name: "OpenStreetMap".to_string(),
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_zoom: 19,
        }
    }

    pub fn carto_positron() -> Self {
        Self {
            name: "CartoDB positron".to_string(),
            url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".to_string(),
            attribution: format!(
                r#"{} &copy; <a href="https://carto.com/attributions">CARTO</a>"#,
                OSM_ATTRIBUTION
            ),
            max_zoom: 20,
        }
    }

    pub fn carto_dark_matter() -> Self {
        Self {
            name: "CartoDB dark_matter".to_string(),
            url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            ..Self::carto_positron()
        }
    }

    pub fn carto_voyager() -> Self {
        Self {
            name: "CartoDB Voyager".to_string(),
            url: "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png".to_string(),
            ..Self::carto_positron()
        }
    }

    pub fn esri_world_imagery() -> Self {
        Self {
            name: "Esri.WorldImagery".to_string(),
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                .to_string(),
            attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, \
                Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community"
                .to_string(),
            max_zoom: 18,
        }
    }

    pub fn esri_world_street_map() -> Self {
        Self {
            name: "Esri.WorldStreetMap".to_string(),
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}"
                .to_string(),
            attribution: "Tiles &copy; Esri &mdash; Source: Esri, DeLorme, NAVTEQ, USGS, Intermap, iPC, \
                NRCAN, Esri Japan, METI, Esri China (Hong Kong), Esri (Thailand), TomTom, 2012"
                .to_string(),
            max_zoom: 18,
        }
    }

    pub fn open_topo_map() -> Self {
        Self {
            name: "OpenTopoMap".to_string(),
            url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".to_string(),
            attribution: format!(
                r#"{} &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (CC-BY-SA)"#,
                OSM_ATTRIBUTION
            ),
            max_zoom: 17,
        }
    }

    /// A user-supplied URL template
    pub fn custom(url: &str) -> Self {
        Self {
            name: "Custom tiles".to_string(),
            url: url.to_string(),
            attribution: String::new(),
            max_zoom: 19,
        }
    }
}

impl Default for TileProvider {
    fn default() -> Self {
        Self::open_street_map()
    }
}

impl FromStr for TileProvider {
    type Err = Error;

    /// Accepts a provider name (case and separators ignored) or a URL template
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if ["{z}", "{x}", "{y}"].iter().all(|p| s.contains(p)) {
            return Ok(Self::custom(s));
        }

        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "openstreetmap" | "osm" => Ok(Self::open_street_map()),
            "cartodbpositron" => Ok(Self::carto_positron()),
            "cartodbdarkmatter" => Ok(Self::carto_dark_matter()),
            "cartodbvoyager" => Ok(Self::carto_voyager()),
            "esriworldimagery" => Ok(Self::esri_world_imagery()),
            "esriworldstreetmap" => Ok(Self::esri_world_street_map()),
            "opentopomap" => Ok(Self::open_topo_map()),
            _ => Err(Error::ConfigError(format!(
                "unknown tile provider '{}' (expected a known name or a URL template with {{z}}/{{x}}/{{y}})",
                s
            ))),
        }
    }
}
