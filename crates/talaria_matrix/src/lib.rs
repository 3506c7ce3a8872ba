mod zone_matrix;

pub use zone_matrix::{Distance, MatrixError, ZoneId, ZoneMatrix, WAREHOUSE};
