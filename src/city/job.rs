use crate::city::normalize_city;

/// A city scheduled for scraping
///
/// Built once per orchestration run from the autocomplete label and location
/// id, and immutable afterwards. The slug names the per-city directory in the
/// artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityJob {
    /// Human-readable label as returned by the location autocomplete
    pub name: String,

    /// Filesystem-safe identifier derived from `name`
    pub slug: String,

    /// Opaque place identifier understood by the search API
    pub location_id: String,
}

impl CityJob {
    /// Creates a job, deriving the slug from the city name
    pub fn new(name: impl Into<String>, location_id: impl Into<String>) -> Self {
        let name = name.into();
        let slug = normalize_city(&name);
        Self {
            name,
            slug,
            location_id: location_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_slug_derivation() {
        let job = CityJob::new("Lyon (69000)", "AD08FR31096");
        assert_eq!(job.name, "Lyon (69000)");
        assert_eq!(job.slug, "lyon");
        assert_eq!(job.location_id, "AD08FR31096");
    }
}
