//! Chart recommendation: role detection, candidate generation and the
//! weighted scoring model.

mod roles;
mod scorer;

pub use roles::{detect_role, detect_roles, ColumnRole, RoleMap, CATEGORY_AXIS_LIMIT};
pub use scorer::{
    generate_recommendations, Aggregation, ChartRecommendation, ChartType, QuerySpec,
    MAX_RECOMMENDATIONS,
};
