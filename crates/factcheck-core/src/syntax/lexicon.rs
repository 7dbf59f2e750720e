//! Closed-class word tables and the verb lexicon for the shallow parser.
//!
//! Uses compile-time perfect hashing (phf) for O(1) lookup. All keys are
//! lowercase; callers lowercase before looking up.

use phf::{phf_map, phf_set};

pub static DETERMINERS: phf::Set<&'static str> = phf_set! {
    "the", "a", "an", "this", "these", "those", "every", "each", "some",
    "any", "no", "all", "both", "either", "neither", "another", "such",
    "several", "many", "few", "much", "more", "most", "less",
};

pub static POSSESSIVES: phf::Set<&'static str> = phf_set! {
    "my", "your", "his", "her", "its", "our", "their",
};

pub static PRONOUNS: phf::Set<&'static str> = phf_set! {
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them",
    "myself", "yourself", "himself", "herself", "itself", "ourselves",
    "themselves", "someone", "somebody", "everyone", "everybody", "anyone",
    "anybody", "nobody", "something", "everything", "anything", "nothing",
    "one", "mine", "yours", "hers", "ours", "theirs",
};

/// Pronouns that open a relative or embedded clause.
pub static RELATIVES: phf::Set<&'static str> = phf_set! {
    "who", "whom", "whose", "which", "what", "whoever", "whatever", "whichever",
};

pub static PREPOSITIONS: phf::Set<&'static str> = phf_set! {
    "of", "in", "on", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "over", "under", "near", "across",
    "since", "until", "till", "within", "without", "among", "amongst", "per",
    "via", "like", "than", "upon", "toward", "towards", "around", "behind",
    "beyond", "despite", "except", "inside", "outside", "onto", "off",
    "along", "amid", "throughout", "beside", "besides", "versus", "worth",
};

/// Prepositions that may also open an adverbial clause ("after it rained").
pub static CLAUSAL_PREPOSITIONS: phf::Set<&'static str> = phf_set! {
    "before", "after", "since", "until", "till",
};

pub static COORDINATORS: phf::Set<&'static str> = phf_set! {
    "and", "or", "but", "nor",
};

pub static SUBORDINATORS: phf::Set<&'static str> = phf_set! {
    "because", "although", "though", "whereas", "unless", "whether", "if",
    "while", "when", "whenever", "where", "wherever", "once", "as",
};

pub static BE_FORMS: phf::Set<&'static str> = phf_set! {
    "be", "am", "is", "are", "was", "were", "been", "being", "'re", "’re",
    "'m", "’m",
};

pub static HAVE_FORMS: phf::Set<&'static str> = phf_set! {
    "have", "has", "had", "having", "'ve", "’ve",
};

pub static DO_FORMS: phf::Set<&'static str> = phf_set! {
    "do", "does", "did",
};

pub static MODALS: phf::Set<&'static str> = phf_set! {
    "can", "could", "may", "might", "must", "shall", "should", "will",
    "would", "ca", "wo", "'ll", "’ll", "'d", "’d", "ought",
};

pub static NEGATIONS: phf::Set<&'static str> = phf_set! {
    "not", "n't", "n’t", "never",
};

pub static ADVERBS: phf::Set<&'static str> = phf_set! {
    "very", "also", "still", "just", "only", "already", "often", "always",
    "usually", "sometimes", "now", "then", "here", "today", "yesterday",
    "tomorrow", "tonight", "recently", "soon", "again", "too", "even",
    "ever", "quite", "rather", "almost", "nearly", "however", "therefore",
    "thus", "hence", "currently", "reportedly", "approximately", "once",
    "twice", "later", "earlier", "together", "abroad", "away", "back",
    "indeed", "perhaps", "maybe", "instead", "meanwhile", "so", "well",
    "else", "yet", "ago", "annually", "globally",
};

/// Words that can stand alone as a time expression ("last week", "yesterday").
pub static TEMPORAL_WORDS: phf::Set<&'static str> = phf_set! {
    "today", "yesterday", "tomorrow", "tonight", "week", "weeks", "month",
    "months", "year", "years", "day", "days", "night", "morning", "evening",
    "weekend", "decade", "century", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday", "quarter",
};

pub static TEMPORAL_MODIFIERS: phf::Set<&'static str> = phf_set! {
    "last", "next", "this", "every", "each", "previous", "past", "coming",
};

pub static ADJECTIVES: phf::Set<&'static str> = phf_set! {
    "new", "old", "good", "bad", "big", "small", "large", "great", "high",
    "low", "serious", "important", "public", "private", "main", "major",
    "minor", "true", "false", "real", "free", "full", "whole", "young",
    "long", "short", "early", "late", "first", "last", "next", "best",
    "worst", "largest", "smallest", "tallest", "highest", "lowest",
    "biggest", "oldest", "available", "responsible", "able", "likely",
    "other", "same", "different", "certain", "loud", "famous", "tall",
    "rich", "poor", "strong", "weak", "hot", "cold", "safe", "dangerous",
    "healthy", "red", "blue", "green", "black", "white", "round", "flat",
    "open", "closed", "total", "annual", "daily", "monthly", "recent",
    "former", "current", "entire", "several", "various", "huge", "tiny",
    "wide", "deep", "fast", "slow", "easy", "hard", "clear", "key", "top",
    "own", "second", "third", "net", "gross", "average", "wrong", "right",
};

/// Lemmas that form copular or linking predicates.
pub static COPULAR_LEMMAS: phf::Set<&'static str> = phf_set! {
    "be", "seem", "appear", "become",
};

/// Linking verbs whose adjective complement is `acomp` rather than `oprd`.
pub static LINKING_LEMMAS: phf::Set<&'static str> = phf_set! {
    "be", "seem", "appear", "become", "remain", "look", "sound", "feel",
    "stay", "grow", "prove", "turn", "get",
};

/// Abbreviations whose trailing period does not end a sentence or a token.
pub static ABBREVIATIONS: phf::Set<&'static str> = phf_set! {
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "mt.", "vs.",
    "etc.", "e.g.", "i.e.", "rs.", "no.", "nos.", "dev.", "govt.", "dept.",
    "inc.", "ltd.", "co.", "corp.", "approx.", "fig.", "est.", "min.",
    "max.", "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.",
    "sept.", "oct.", "nov.", "dec.", "u.s.", "u.k.", "u.n.", "a.m.", "p.m.",
    "intl.", "natl.", "assn.", "univ.", "gen.", "col.", "lt.", "sgt.",
};

/// Irregular verb forms mapped to their lemma.
pub static IRREGULAR_VERBS: phf::Map<&'static str, &'static str> = phf_map! {
    "am" => "be", "is" => "be", "are" => "be", "was" => "be", "were" => "be",
    "been" => "be", "being" => "be", "'re" => "be", "’re" => "be",
    "'m" => "be", "’m" => "be",
    "has" => "have", "had" => "have", "having" => "have", "'ve" => "have",
    "’ve" => "have",
    "does" => "do", "did" => "do", "done" => "do",
    "ca" => "can", "wo" => "will", "'ll" => "will", "’ll" => "will",
    "'d" => "would", "’d" => "would",
    "went" => "go", "gone" => "go", "goes" => "go",
    "made" => "make", "took" => "take", "taken" => "take",
    "gave" => "give", "given" => "give", "said" => "say", "says" => "say",
    "saw" => "see", "seen" => "see", "came" => "come",
    "got" => "get", "gotten" => "get", "knew" => "know", "known" => "know",
    "thought" => "think", "told" => "tell", "found" => "find",
    "became" => "become", "began" => "begin", "begun" => "begin",
    "built" => "build", "bought" => "buy", "brought" => "bring",
    "held" => "hold", "kept" => "keep", "left" => "leave", "led" => "lead",
    "lost" => "lose", "meant" => "mean", "met" => "meet", "paid" => "pay",
    "ran" => "run", "sent" => "send", "spent" => "spend", "stood" => "stand",
    "won" => "win", "wrote" => "write", "written" => "write",
    "grew" => "grow", "grown" => "grow", "fell" => "fall", "fallen" => "fall",
    "felt" => "feel", "rose" => "rise", "risen" => "rise", "shown" => "show",
    "spoke" => "speak", "spoken" => "speak", "taught" => "teach",
    "understood" => "understand", "wore" => "wear", "worn" => "wear",
    "ate" => "eat", "eaten" => "eat", "drove" => "drive", "driven" => "drive",
    "chose" => "choose", "chosen" => "choose", "broke" => "break",
    "broken" => "break", "sold" => "sell", "struck" => "strike",
    "fought" => "fight", "caught" => "catch", "sought" => "seek",
    "drew" => "draw", "drawn" => "draw", "flew" => "fly", "flown" => "fly",
    "froze" => "freeze", "frozen" => "freeze", "hid" => "hide",
    "hidden" => "hide", "lay" => "lie", "lain" => "lie", "laid" => "lay",
    "slept" => "sleep", "swam" => "swim", "threw" => "throw",
    "thrown" => "throw", "woke" => "wake", "woken" => "wake",
    "heard" => "hear", "dealt" => "deal", "fed" => "feed", "bent" => "bend",
    "lent" => "lend", "shot" => "shoot", "shut" => "shut", "sat" => "sit",
    "forgot" => "forget", "forgotten" => "forget", "forgave" => "forgive",
    "forgiven" => "forgive", "overtook" => "overtake",
    "undertook" => "undertake", "withdrew" => "withdraw",
    "withdrawn" => "withdraw", "born" => "bear",
};

/// Irregular past participles (used for passive and perfect detection).
pub static IRREGULAR_PARTICIPLES: phf::Set<&'static str> = phf_set! {
    "been", "done", "gone", "made", "taken", "given", "said", "seen", "got",
    "gotten", "known", "thought", "told", "found", "become", "begun", "built",
    "bought", "brought", "held", "kept", "left", "led", "lost", "meant",
    "met", "paid", "put", "run", "sent", "set", "spent", "stood", "won",
    "written", "grown", "fallen", "felt", "risen", "shown", "spoken",
    "taught", "understood", "worn", "eaten", "driven", "chosen", "broken",
    "sold", "struck", "fought", "caught", "sought", "drawn", "flown",
    "frozen", "hidden", "laid", "thrown", "heard", "hit", "cut", "let",
    "read", "shut", "forgotten", "forgiven", "withdrawn", "come", "born",
};

/// Base forms of verbs the tagger recognises. Inflected forms are reduced to
/// these through [`super::lemma::verb_lemma`].
pub static VERBS: phf::Set<&'static str> = phf_set! {
    "be", "have", "do", "go", "make", "take", "give", "say", "see", "come",
    "get", "know", "think", "tell", "find", "become", "begin", "build", "buy",
    "bring", "hold", "keep", "leave", "lead", "lose", "mean", "meet", "pay",
    "put", "run", "send", "set", "spend", "stand", "win", "write", "grow",
    "fall", "feel", "rise", "show", "speak", "teach", "understand", "wear",
    "eat", "drive", "choose", "break", "sell", "strike", "fight", "catch",
    "seek", "draw", "fly", "freeze", "hide", "lie", "lay", "sleep", "swim",
    "throw", "wake", "hear", "deal", "feed", "bend", "lend", "shoot", "shut",
    "sit", "forget", "forgive", "overtake", "undertake", "withdraw", "hit",
    "cut", "let", "read", "seem", "appear", "remain", "stay", "look", "sound",
    "prove", "turn", "locate", "situate", "launch", "announce", "sanction",
    "provide", "cause", "create", "develop", "produce", "increase",
    "decrease", "reduce", "raise", "approve", "reject", "claim", "state",
    "report", "confirm", "deny", "declare", "release", "publish", "invest",
    "allocate", "fund", "support", "cover", "include", "contain", "consist",
    "involve", "require", "allow", "enable", "prevent", "protect", "help",
    "serve", "offer", "receive", "accept", "use", "employ", "hire", "open",
    "close", "start", "stop", "end", "finish", "complete", "achieve", "reach",
    "exceed", "surpass", "host", "visit", "travel", "move", "live", "die",
    "kill", "bear", "marry", "name", "call", "rename", "elect", "appoint",
    "nominate", "resign", "retire", "join", "form", "found", "establish",
    "design", "invent", "discover", "explore", "study", "learn", "work",
    "play", "score", "beat", "defeat", "own", "acquire", "merge", "sign",
    "ban", "permit", "order", "rule", "govern", "manage", "operate",
    "control", "regulate", "plan", "expect", "estimate", "predict",
    "forecast", "measure", "weigh", "cost", "earn", "generate", "export",
    "import", "ship", "deliver", "supply", "apply", "reply", "drop", "jump",
    "rank", "rate", "grant", "award", "honour", "honor", "celebrate", "mark",
    "observe", "record", "register", "list", "add", "remove", "replace",
    "change", "improve", "boost", "lower", "double", "triple", "extend",
    "expand", "connect", "link", "border", "separate", "divide", "share",
    "belong", "exist", "happen", "occur", "emerge", "originate", "flow",
    "erupt", "orbit", "revolve", "rotate", "boil", "melt", "contribute",
    "account", "comprise", "represent", "indicate", "suggest", "believe",
    "assume", "consider", "regard", "describe", "define", "attack", "invade",
    "occupy", "capture", "destroy", "damage", "affect", "threaten", "power",
    "fuel", "inspire", "influence", "dominate", "follow", "precede",
    "succeed", "fail", "collapse", "crash", "sink", "burn", "flood", "spread",
    "infect", "cure", "treat", "vaccinate", "test", "detect", "identify",
    "recognize", "recognise", "commemorate", "inaugurate", "unveil",
    "dedicate", "implement", "enforce", "introduce", "pass", "enact", "amend",
    "repeal", "disburse", "distribute", "transfer", "collect", "save",
    "store", "manufacture", "assemble", "construct", "prohibit", "restrict",
    "limit", "cap", "fix", "target", "aim", "want", "need", "try", "decide",
    "agree", "refuse", "promise", "hope", "continue", "talk", "ask", "answer",
    "argue", "insist", "warn", "urge", "recommend", "propose", "demand",
};
