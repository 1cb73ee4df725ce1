//! 빈 팩토리 데모 애플리케이션
//!
//! 작은 객체 그래프(서로를 참조하는 두 싱글톤, prototype, 자식 정의, 팩토리 빈, 별칭)를
//! 구성하고 모든 싱글톤을 미리 생성한 뒤 결과를 요약해 출력합니다.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bean_factory::config::FactoryConfig;
use bean_factory::core::errors::BeansResult;
use bean_factory::core::factory::{BeanFactory, DefaultBeanFactory, ListableBeanFactory};
use bean_factory::domain::bean::{Bean, BeanObject, FactoryBean, HookError};
use bean_factory::domain::class::BeanClass;
use bean_factory::domain::definition::{ChildBeanDefinition, RootBeanDefinition};
use bean_factory::domain::property_values::PropertyValues;
use bean_factory::domain::value::Value;
use bean_factory::utils::display_terminal::{
    print_boxed_title, print_factory_summary, print_step_complete, print_step_start,
    print_sub_task,
};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use once_cell::sync::Lazy;

#[derive(Default)]
struct Person {
    name: Option<String>,
    age: i32,
    spouse: Option<BeanObject>,
}

impl Bean for Person {}

static PERSON_CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
    BeanClass::builder::<Person>("Person")
        .property("name", |p: &Person| p.name.clone(), |p, v| p.name = v)
        .property("age", |p: &Person| p.age, |p, v| p.age = v)
        .property("spouse", |p: &Person| p.spouse.clone(), |p, v| p.spouse = v)
        .build()
});

/// 호출될 때마다 번호가 붙은 새 `Person`을 만드는 팩토리 빈
#[derive(Default)]
struct PersonFactory {
    prefix: Option<String>,
    issued: AtomicUsize,
}

impl Bean for PersonFactory {
    fn as_factory_bean(&self) -> Option<&dyn FactoryBean> {
        Some(self)
    }
}

impl FactoryBean for PersonFactory {
    fn get_object(&self) -> Result<BeanObject, HookError> {
        let number = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let prefix = self.prefix.as_deref().unwrap_or("person");
        let person = Person {
            name: Some(format!("{}-{}", prefix, number)),
            ..Person::default()
        };
        Ok(BeanObject::new(Arc::clone(&PERSON_CLASS), person))
    }

    fn is_singleton(&self) -> bool {
        false
    }

    fn property_values(&self) -> Option<PropertyValues> {
        Some(PropertyValues::new().with("age", 1))
    }
}

static PERSON_FACTORY_CLASS: Lazy<Arc<BeanClass>> = Lazy::new(|| {
    BeanClass::builder::<PersonFactory>("PersonFactory")
        .implements("FactoryBean")
        .property(
            "prefix",
            |f: &PersonFactory| f.prefix.clone(),
            |f, v| f.prefix = v,
        )
        .build()
});

fn main() -> ExitCode {
    load_env_file();
    init_logging();

    info!("🚀 Bean factory 데모 시작중...");

    match run() {
        Ok(()) => {
            info!("✅ 객체 그래프가 성공적으로 구성되었습니다!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ 객체 그래프 구성 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> BeansResult<()> {
    print_boxed_title("Bean Factory Demo");
    let factory = DefaultBeanFactory::with_config(FactoryConfig::from_env());

    print_step_start(1, "Registering bean definitions");
    register_definitions(&factory)?;
    for name in factory.definition_names() {
        let scope = if factory.is_singleton(&format!("&{}", name))? {
            "singleton"
        } else {
            "prototype"
        };
        print_sub_task(&name, scope);
    }
    print_step_complete(1, "Bean definitions registered", factory.definition_count());

    print_step_start(2, "Registering aliases");
    factory.register_alias("rod", "husband")?;
    factory.register_alias("kerry", "wife")?;
    print_step_complete(2, "Aliases registered", factory.alias_count());

    print_step_start(3, "Realizing singletons");
    let realized = factory.realize_all_singletons()?;
    print_step_complete(3, "Singletons realized", realized);

    print_step_start(4, "Resolving beans");
    let resolved = ["husband", "wife", "kid", "grandchild", "people", "&people"]
        .into_iter()
        .map(|name| factory.get_bean(name).map(|bean| (name, bean)))
        .collect::<BeansResult<Vec<_>>>()?;
    for (name, bean) in &resolved {
        print_sub_task(name, &describe(bean));
    }

    let husband = factory.get_bean("husband")?;
    let wife = factory.get_bean("wife")?;
    let spouse_is_wife = husband
        .with(|p: &Person| p.spouse.clone())
        .flatten()
        .is_some_and(|spouse| spouse.ptr_eq(&wife));
    print_sub_task("husband.spouse == wife", &spouse_is_wife.to_string());

    let kids_distinct = !factory.get_bean("kid")?.ptr_eq(&factory.get_bean("kid")?);
    print_sub_task("kid is prototype", &kids_distinct.to_string());
    print_step_complete(4, "Beans resolved", resolved.len());

    print_factory_summary(
        factory.definition_count(),
        factory.singleton_count(),
        factory.alias_count(),
    );
    Ok(())
}

fn describe(bean: &BeanObject) -> String {
    bean.with(|p: &Person| {
        format!(
            "{} ({} years) {:?}",
            p.name.as_deref().unwrap_or("unnamed"),
            p.age,
            bean
        )
    })
    .unwrap_or_else(|| format!("{:?}", bean))
}

fn register_definitions(factory: &DefaultBeanFactory) -> BeansResult<()> {
    let person = || Arc::clone(&PERSON_CLASS);

    factory.register_definition(
        "rod",
        RootBeanDefinition::singleton(
            person(),
            PropertyValues::new()
                .with("name", "Rod")
                .with("age", "31")
                .with("spouse", Value::reference("kerry")),
        ),
    )?;
    factory.register_definition(
        "kerry",
        RootBeanDefinition::singleton(
            person(),
            PropertyValues::new()
                .with("name", "Kerry")
                .with("age", 34)
                .with("spouse", Value::reference("rod")),
        ),
    )?;
    factory.register_definition(
        "kid",
        RootBeanDefinition::prototype(
            person(),
            PropertyValues::new().with("name", "Kid").with("age", 5),
        ),
    )?;
    factory.register_definition(
        "grandchild",
        ChildBeanDefinition::new(
            "kid",
            PropertyValues::new().with("name", "Grandchild"),
            true,
        ),
    )?;
    factory.register_definition(
        "people",
        RootBeanDefinition::singleton(
            Arc::clone(&PERSON_FACTORY_CLASS),
            PropertyValues::new().with("prefix", "generated"),
        ),
    )?;
    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// # Examples
///
/// ```bash
/// # 개발 환경
/// PROFILE=dev cargo run
///
/// # 부모 체인 깊이 제한을 바꿔서 실행
/// BEAN_FACTORY_MAX_PARENT_DEPTH=8 cargo run
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 기본 레벨은 info이며 `RUST_LOG`로 바꿀 수 있습니다.
///
/// ```bash
/// # 빈 생성과 캐시 적중까지 보기
/// RUST_LOG=bean_factory=debug cargo run
///
/// # 프로퍼티 쓰기까지 보기
/// RUST_LOG=bean_factory::binder=trace cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}
