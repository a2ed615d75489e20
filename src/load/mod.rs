//! 냉간 입력과 열부하 계산 모듈을 모아둔다.
//! 6개 부하 항목(Q1~Q6), 설비부하, 기계부하로 구성한다.

pub mod heat_load;
pub mod room;
