//! 냉간 환기/개문 부하 계산에 쓰이는 습공기 근사식.
//!
//! 모두 순수 함수이며, -50~+50°C, 상대습도 0~100% 범위에서 안정적으로 동작해야 한다.

/// 0°C 기준 포화수증기압(Pa). 분모 특이점 보호 시 반환한다.
pub const REFERENCE_SATURATION_PRESSURE_PA: f64 = 610.78;

/// 표준 대기압(Pa)
pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

/// 건구온도로 포화수증기압(Pa)을 계산한다.
///
/// `p = 10^((10.286·T − 2148.4909)/(T − 35.85))`, T는 켈빈.
/// 분모가 0 이하가 되면 0°C 기준값을 돌려준다.
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    let t_k = temp_c + 273.15;
    let denominator = t_k - 35.85;
    if denominator <= 0.0 {
        return REFERENCE_SATURATION_PRESSURE_PA;
    }
    let exponent = (10.286 * t_k - 2148.4909) / denominator;
    10f64.powf(exponent)
}

/// 습도비 d(kg/kg). 수증기분압이 대기압에 근접하면 분모를 작은 양수로 제한한다.
pub fn humidity_ratio(temp_c: f64, relative_humidity_pct: f64) -> f64 {
    let p_v = saturation_vapor_pressure(temp_c) * relative_humidity_pct / 100.0;
    let denom = (STANDARD_PRESSURE_PA - p_v).max(1e-6);
    0.622 * p_v / denom
}

/// 습공기 비엔탈피(kJ/kg): `h = 1.01·t + d·(2501 + 1.85·t)`.
pub fn moist_air_enthalpy(temp_c: f64, relative_humidity_pct: f64) -> f64 {
    let d = humidity_ratio(temp_c, relative_humidity_pct);
    1.01 * temp_c + d * (2501.0 + 1.85 * temp_c)
}

/// 습공기 밀도(kg/m³). 이상기체 밀도를 수증기 분압으로 보정한다.
pub fn moist_air_density(temp_c: f64, relative_humidity_pct: f64) -> f64 {
    let p_sat = saturation_vapor_pressure(temp_c);
    1.293 * 273.15 / (273.15 + temp_c)
        * (0.101325 - 0.0378 * relative_humidity_pct * p_sat / 1_000_000.0)
        / 0.1013
}
