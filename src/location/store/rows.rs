//! Row shapes shared by the SQL gateways.

use crate::location::record::{Building, City, Street};

#[derive(sqlx::FromRow)]
pub(crate) struct CityRow {
    pub id: i64,
    pub ident: String,
    pub cityid: Option<i64>,
}

impl CityRow {
    pub fn extract(self) -> City {
        City {
            id: self.id,
            ident: self.ident,
            city_id: self.cityid,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct StreetRow {
    pub id: i64,
    pub ident: String,
    pub cityid: i64,
}

impl StreetRow {
    pub fn extract(self) -> Street {
        Street {
            id: self.id,
            ident: self.ident,
            city_id: self.cityid,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BuildingRow {
    pub id: i64,
    pub city_id: i64,
    pub street_id: Option<i64>,
    pub building_num: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl BuildingRow {
    pub fn extract(self) -> Building {
        Building {
            id: self.id,
            city_id: self.city_id,
            street_id: self.street_id,
            building_num: self.building_num,
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }
}
