//! 터미널 출력 포맷팅 유틸리티
//!
//! 데모 바이너리가 객체 그래프를 구성하는 과정을 단계별로 보여줄 때 사용합니다.

const BOX_WIDTH: usize = 50;

/// 박스로 둘러싸인 제목을 중앙 정렬해 출력합니다
///
/// # Examples
///
/// ```rust,ignore
/// use bean_factory::utils::display_terminal::print_boxed_title;
///
/// print_boxed_title("Bean Factory Demo");
/// ```
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                Bean Factory Demo                 ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);

    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

/// 진행 단계 시작 표시
///
/// ```text
/// → Step 1: Registering bean definitions
/// ```
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

/// 진행 단계 완료 표시 (처리된 항목 수 포함)
///
/// ```text
/// ✓ Step 1: Bean definitions registered (6 items)
/// ```
pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 들여쓰기된 하위 항목 출력
///
/// ```text
///    ├─ husband: TestBean@0x55d0c3a1f2b0
/// ```
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 팩토리 구성 완료 요약
///
/// # Arguments
///
/// * `definitions` - 등록된 빈 정의 수
/// * `singletons` - 캐시된 싱글톤 수
/// * `aliases` - 등록된 별칭 수
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║            🎉 BEAN FACTORY READY                 ║
/// ╚══════════════════════════════════════════════════╝
///    📦 Definitions: 6
///    🔒 Singletons: 4
///    🔗 Aliases: 1
/// ```
pub fn print_factory_summary(definitions: usize, singletons: usize, aliases: usize) {
    println!();
    print_boxed_title("🎉 BEAN FACTORY READY");
    println!("   📦 Definitions: {}", definitions);
    println!("   🔒 Singletons: {}", singletons);
    println!("   🔗 Aliases: {}", aliases);
    println!();
}
