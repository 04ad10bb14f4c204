//! Fixed vocabularies for the selection form: seasons, Plutchik emotions,
//! and the Japanese aesthetic taxonomy with its descriptive text.

/// Season choices. `無季` marks seasonless haiku.
pub const SEASONS: [&str; 6] = ["春", "夏", "秋", "冬", "新年", "無季"];

/// The 8-value Plutchik primary emotion set used to tag the corpus.
pub const EMOTIONS: [&str; 8] = [
    "喜び", "信頼", "恐れ", "驚き", "悲しみ", "嫌悪", "怒り", "期待",
];

/// Sentinel aesthetic value that disables the aesthetic filter entirely.
pub const SKIP_AESTHETIC: &str = "スキップ";

/// All selectable aesthetics, skip sentinel first.
pub const AESTHETICS: [&str; 13] = [
    SKIP_AESTHETIC,
    "侘び",
    "寂び",
    "幽玄",
    "もののあはれ",
    "風雅",
    "無常",
    "愛らしさ",
    "素朴",
    "滑稽",
    "淡白",
    "静寂",
    "余情",
];

/// Descriptive text for each aesthetic, shown alongside the form choice.
pub fn aesthetic_info(aesthetic: &str) -> Option<&'static str> {
    let info = match aesthetic {
        SKIP_AESTHETIC => "今回は情緒指定を行わず、他の条件を優先します。",
        "侘び" => {
            "素朴・不完全の美。整いすぎない形や静かな孤独に美を見出す。\
             → 彩度を抑え、余白を広く取り、和紙の質感や滲みを生かす。\
             “欠け”や“粗さ”がむしろ深みを与える。"
        }
        "寂び" => {
            "古びの味わい・時間の痕跡。歳月が刻んだ静かな美。\
             → 錆色や風化した木、にじみのある筆致などを表現。\
             朽ちゆくものの中に生命の余韻を感じる。"
        }
        "幽玄" => {
            "見えない深み・余韻の美。すべてを語らず、想像に委ねる。\
             → 霞や遠景、藍の層で輪郭を曖昧にし、光と影で深さを示す。\
             “見えないもの”が心を動かす世界。"
        }
        "もののあはれ" => {
            "移ろいへの感受。儚く消えゆく瞬間に心を寄せる美意識。\
             → 落葉・夕暮・川音など、去りゆくものを描く。\
             感情を抑えつつ、無常を受け入れる優しさを持つ。"
        }
        "風雅" => {
            "気品・洗練。控えめで上品な趣。\
             → 構図は端正に、間（ま）を大切にし、金や光をさりげなく添える。\
             優雅で凛とした印象を与える。"
        }
        "無常" => {
            "うつり変わり・儚さ。永遠ではないものへの慈しみ。\
             → 消えゆく光や淡い明暗差、雲の流れなどを通して“今この瞬間”を描く。\
             生と死の循環を静かに受け止める感性。"
        }
        "愛らしさ" => {
            "小動物や子どもの可憐さ。小さな命へのまなざし。\
             → うさぎ・雀・子どもなどを主役にしすぎず、自然の中に溶け込ませる。\
             生命のあたたかさをそっと伝える。"
        }
        "素朴" => {
            "飾り気のなさ・自然体の美。\
             → 単純な形、控えめな色彩、過剰な装飾を避ける。\
             無理のない姿の中に安らぎが宿る。"
        }
        "滑稽" => {
            "ユーモア・可笑しみ。人や動物の“ちょっとしたズレ”に愛嬌を見出す。\
             → 表情や配置に軽いひねりを入れ、温かみのある笑いを生む。\
             一茶らしい人間味を感じさせる美。"
        }
        "淡白" => {
            "あっさり・簡素。余分を削ぎ落とし、静けさを残す美。\
             → 筆数を抑え、広い余白を取り、色彩を最小限に。\
             潔く、澄みきった世界を描く。"
        }
        "静寂" => {
            "静けさの美。音のない空間に心の声を聴く感性。\
             → 空・水面・雪など、動きを抑えたフラットな面を広く使う。\
             無言の中に温度と気配を感じさせる。"
        }
        "余情" => {
            "言外の余韻。語らぬ部分に情を残す美。\
             → 断片を置き、すべてを語らない構図にする。\
             “続きを見る者の心に委ねる”という詩的な間（ま）の美学。"
        }
        _ => return None,
    };
    Some(info)
}
