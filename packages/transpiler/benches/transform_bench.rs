use criterion::{black_box, criterion_group, criterion_main, Criterion};
use livepad_transpiler::transform;

fn transform_small_component(c: &mut Criterion) {
    let source = r#"
        export default function App() {
            return <div className="app"><h1>Hello World</h1></div>;
        }
    "#;

    c.bench_function("transform_small_component", |b| {
        b.iter(|| transform(black_box(source)))
    });
}

fn transform_list_component(c: &mut Criterion) {
    let item = r#"
        function Row{n}({ label, onSelect }) {
            const [open, setOpen] = useState(false);
            return (
                <li className={open ? "open" : ""} onClick={() => setOpen(!open)}>
                    <span>{label}</span>
                    {open && <button onClick={onSelect}>Select &rarr;</button>}
                </li>
            );
        }
    "#;
    let source: String = (0..50).map(|n| item.replace("{n}", &n.to_string())).collect();

    c.bench_function("transform_list_component", |b| {
        b.iter(|| transform(black_box(&source)))
    });
}

criterion_group!(benches, transform_small_component, transform_list_component);
criterion_main!(benches);
