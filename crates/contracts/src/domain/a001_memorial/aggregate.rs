use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::banner::{BannerSelection, DEFAULT_BANNER_COLOR};
use super::display;
use crate::domain::common::{AggregateId, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор мемориала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemorialId(pub Uuid);

impl MemorialId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for MemorialId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(MemorialId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Мемориальная страница
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memorial {
    pub id: MemorialId,

    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "middleName")]
    pub middle_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: String,

    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "dateOfDeath")]
    pub date_of_death: Option<NaiveDate>,

    pub quote: Option<String>,
    pub biography: Option<String>,

    pub banner: BannerSelection,

    pub metadata: EntityMetadata,
}

impl Memorial {
    /// Создать новый мемориал для вставки в БД
    pub fn new_for_insert(dto: &MemorialDto) -> Self {
        Self {
            id: MemorialId::new_v4(),
            first_name: dto.first_name.trim().to_string(),
            middle_name: non_empty(dto.middle_name.as_deref()),
            last_name: dto.last_name.trim().to_string(),
            date_of_birth: dto.date_of_birth,
            date_of_death: dto.date_of_death,
            quote: non_empty(dto.quote.as_deref()),
            biography: non_empty(dto.biography.as_deref()),
            banner: BannerSelection::color(DEFAULT_BANNER_COLOR),
            metadata: EntityMetadata::new(),
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Полное имя в том виде, в каком его показывает страница
    pub fn full_name(&self) -> String {
        display::full_name(
            &self.first_name,
            self.middle_name.as_deref().unwrap_or_default(),
            &self.last_name,
        )
    }

    pub fn dates_display(&self) -> String {
        display::format_dates(self.date_of_birth, self.date_of_death)
    }

    /// Цитата с подстановкой значения по умолчанию
    pub fn quote_display(&self) -> String {
        display::quote_or_default(self.quote.as_deref().unwrap_or_default(), &self.full_name())
    }

    pub fn biography_html(&self) -> String {
        display::biography_html(self.biography.as_deref().unwrap_or_default())
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("First name is required".into());
        }
        if self.last_name.trim().is_empty() {
            return Err("Last name is required".into());
        }
        validate_dates(
            self.date_of_birth,
            self.date_of_death,
            chrono::Utc::now().date_naive(),
        )
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

/// Даты не могут быть в будущем, дата смерти не раньше даты рождения
pub fn validate_dates(
    date_of_birth: NaiveDate,
    date_of_death: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), String> {
    if date_of_birth > today {
        return Err("Date of birth cannot be in the future. Please select a past date.".into());
    }
    if let Some(death) = date_of_death {
        if death > today {
            return Err(
                "Date of death cannot be in the future. Please select a past date.".into(),
            );
        }
        if death < date_of_birth {
            return Err("Date of death cannot be before date of birth.".into());
        }
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания мемориала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorialDto {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "middleName", default)]
    pub middle_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "dateOfDeath", default)]
    pub date_of_death: Option<NaiveDate>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
}
