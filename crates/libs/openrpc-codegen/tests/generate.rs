use openrpc_codegen::{
    CodegenError, Emitter, GeneratedFile, GeneratorContext, PythonEmitter, TargetLanguage,
    TypeScriptEmitter, emitter_for,
};
use openrpc_types::OpenRpc;

fn load(fixture: &str) -> GeneratorContext {
    let path = format!("{}/tests/fixtures/{fixture}", env!("CARGO_MANIFEST_DIR"));
    let json = std::fs::read_to_string(&path).unwrap();
    let document = OpenRpc::from_json_str(&json).unwrap();
    GeneratorContext::from_document(&document).unwrap()
}

fn contents<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
    files
        .iter()
        .find(|file| file.path.ends_with(name))
        .map(|file| file.contents.as_str())
        .unwrap_or_else(|| panic!("{name} was not generated"))
}

#[test]
fn test_person_python_models_and_client() {
    let ctx = load("person.json");
    let files = PythonEmitter.emit_all(&ctx).unwrap();

    let models = contents(&files, "models.py");
    assert!(models.contains("class Person(BaseModel):"));
    assert!(models.contains("    name: str\n"));
    assert!(models.contains("    age: int\n"));
    assert!(models.contains("    parent: Optional[Person] = None\n"));
    assert!(models.contains("Person.model_rebuild()"));

    let client = contents(&files, "client.py");
    assert!(client.contains(
        "    def create_person(self, name: str, age: int, parent: Optional[Person] = None) -> Person:"
    ));
    assert!(client.contains("class PeopleHTTPClient(RPCHTTPClient):"));
    assert!(client.contains("    LOCAL = \"http://localhost:8000/rpc\""));

    let pyproject = contents(&files, "pyproject.toml");
    assert!(pyproject.contains("name = \"people-client\""));
}

#[test]
fn test_person_typescript() {
    let ctx = load("person.json");
    let files = TypeScriptEmitter.emit_all(&ctx).unwrap();

    let models = contents(&files, "models.ts");
    assert!(models.contains("export class Person {"));
    assert!(models.contains("  parent?: Person | null;"));

    let client = contents(&files, "client.ts");
    assert!(client.contains(
        "  async createPerson(name: string, age: number, parent?: Person): Promise<Person> {"
    ));
    assert!(client.contains("    return Person.fromJSON(result);"));
}

#[test]
fn test_math_groups() {
    let ctx = load("math.json");
    assert_eq!(ctx.groups.method_count(), 4);

    let python = PythonEmitter.emit_client(&ctx).unwrap();
    let client = contents(&python, "client.py");
    assert!(client.contains("class MathApiMathMethods:"));
    assert!(client.contains("class MathApiMathStatsMethods:"));
    assert!(client.contains("class MathApiMathStatsAsyncMethods:"));
    assert!(client.contains("    async def mean(self, values: list[float]) -> Optional[float]:"));
    assert!(client.contains("    def mean(self, values: list[float]) -> Optional[float]:"));
    assert!(client.contains("    def ping(self) -> None:"));

    let typescript = TypeScriptEmitter.emit_client(&ctx).unwrap();
    let client = contents(&typescript, "client.ts");
    assert!(client.contains("export interface MathAddParameters {"));
    assert!(client.contains("  async add({ a, b }: MathAddParameters): Promise<number> {"));
    assert!(client.contains("  async subtract(a: number, b: number): Promise<number> {"));
    assert!(client.contains("  async ping(): Promise<void> {"));
    assert!(client.contains("    this.math = new MathApiMathMethods(rpc);"));

    // no schemas, no models file
    assert!(TypeScriptEmitter.emit_models(&ctx).unwrap().is_empty());
    assert!(!contents(&typescript, "index.ts").contains("models"));
}

#[test]
fn test_generation_is_idempotent() {
    for fixture in ["person.json", "math.json"] {
        for language in TargetLanguage::ALL {
            let emitter = emitter_for(language);
            let first = emitter.emit_all(&load(fixture)).unwrap();
            let second = emitter.emit_all(&load(fixture)).unwrap();
            assert_eq!(first, second, "{fixture} / {language}");
        }
    }
}

#[test]
fn test_client_dirs() {
    let ctx = load("math.json");
    assert_eq!(
        PythonEmitter.client_dir(&ctx),
        std::path::PathBuf::from("python/math_api_client")
    );
    assert_eq!(
        TypeScriptEmitter.client_dir(&ctx),
        std::path::PathBuf::from("typescript/math_api_client")
    );
}

#[test]
fn test_unresolved_reference_is_rejected() {
    let json = include_str!("fixtures/person.json").replace("\"Person\": {", "\"Human\": {");
    let document = OpenRpc::from_json_str(&json).unwrap();
    let error = GeneratorContext::from_document(&document).unwrap_err();
    assert!(matches!(error, CodegenError::UnresolvedReference { .. }));
}
